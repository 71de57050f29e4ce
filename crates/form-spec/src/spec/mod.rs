pub mod field;
pub mod form;
pub mod logic;
pub mod rule;

pub use field::{FieldDefinition, FieldOption, FieldType};
pub use form::{FormDefinition, FormError};
pub use logic::{ConditionOperator, ConditionRule, LogicAction, LogicBlock, LogicType};
pub use rule::{RuleParams, RuleType, ValidationRule};
