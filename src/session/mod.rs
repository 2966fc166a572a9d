pub mod cookie;
pub mod token;

pub use cookie::TokenCookieBuilder;
pub use token::AttributionToken;
