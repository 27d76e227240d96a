/// Unwraps a `Result<Option<T>, E>` inside an iterator's `next`, returning
/// `Some(Err(e))` from the enclosing function on error.
#[macro_export]
macro_rules! try_some {
    ($expr:expr) => {
        match $expr {
            Ok(Some(v)) => Some(v),
            Ok(None) => None,
            Err(e) => return Some(Err(From::from(e))),
        }
    };
}

/// Decodes a field that the receiver may leave empty.
/// An empty field becomes `None`, anything else goes through `$parse` and
/// its error is propagated with `?`.
#[macro_export]
macro_rules! accept {
    ($field:expr, $parse:expr) => {
        match $field {
            "" => None,
            f => Some($parse(f)?),
        }
    };
}

/// Decodes a field that has to be present. An empty field is reported as
/// `ParseError::UnexpectedValue` naming `$name`.
#[macro_export]
macro_rules! expect {
    ($field:expr, $parse:expr, $name:expr) => {
        match accept!($field, $parse) {
            Some(v) => v,
            None => return Err(ParseError::UnexpectedValue($name)),
        }
    };
}
