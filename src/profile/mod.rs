//! Alumni profile: field catalog, data model, prompts, validators and the
//! completion gate.

pub mod completion;
pub mod fields;
pub mod geography;
pub mod model;
pub mod prompts;
pub mod validation;

pub use completion::{SearchAccess, can_access_search, completion_percentage, incomplete_fields};
pub use fields::Field;
pub use model::{FieldValue, UserRecord};
pub use validation::{FieldValidator, ValidationResult};
