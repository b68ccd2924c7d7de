pub mod formatter;

pub use formatter::{
    format_fos, format_json, format_level, format_prediction, format_response, should_use_colors,
};
