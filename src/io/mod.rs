mod cursor;

pub use cursor::{ByteCursor, INITIAL_OFFSET};
