pub mod card;
pub mod footer;
pub mod header;
pub mod utils;

pub use card::{character_lines, character_row};
pub use footer::draw_footer;
pub use header::draw_header;
