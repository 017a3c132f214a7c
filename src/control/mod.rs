pub mod closed_loop;
pub mod in_position;
pub mod math_tool;
