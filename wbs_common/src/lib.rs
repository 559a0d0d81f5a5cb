mod centavos;
mod helpers;
pub mod op;
mod secret;

pub use centavos::{Centavos, CentavosConversionError, PESO_CURRENCY_CODE, PESO_CURRENCY_CODE_LOWER};
pub use helpers::parse_boolean_flag;
pub use secret::Secret;
