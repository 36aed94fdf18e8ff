pub mod header;
pub mod picker;

pub use header::draw_header;
pub use picker::draw_mood_picker;
