//! Helper functions shared by the view builders
//!
//! Date formatting, HTML escaping and URL joining.

mod date;
mod html;
mod url;

pub use self::date::*;
pub use self::html::*;
pub use self::url::*;
