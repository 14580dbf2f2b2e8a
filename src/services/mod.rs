pub mod index;
pub mod matcher;
pub mod narration;

pub use matcher::{Matcher, Recommendation};
pub use narration::{HttpTtsProvider, NarrationProvider, Narrator};
