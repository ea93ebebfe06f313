#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error("{}", out_of_range_message(.op))]
    OutOfRange { op: &'static str },

    #[error("linked list indices must be integers or slices, not {type_name}")]
    InvalidIndexType { type_name: String },

    #[error("{value} is not in linked list")]
    ValueNotFound { value: String },
}

fn out_of_range_message(op: &str) -> String {
    match op {
        "pop" => "pop from empty linked list".to_string(),
        op => format!("linked list {} out of range", op),
    }
}

pub type Result<T> = std::result::Result<T, ListError>;
