use anyhow::Error;

/// Exit-with-an-error-message alternative to `unwrap`, for the binaries'
/// outermost layer: prints the whole cause chain instead of a panic trace.
pub trait NiceError<T> {
    /// Exit with `1` printing the error if the value is not present, otherwise
    /// return the content.
    fn nice_unwrap(self) -> T;
}

fn print_error(error: &Error) {
    debug!("{:?}", error);
    let mut fail: &dyn std::error::Error = error.as_ref();
    eprintln!("Error: {fail}");
    while let Some(cause) = fail.source() {
        eprintln!("\nCaused by:\n    {cause}");
        fail = cause;
    }
}

impl<T> NiceError<T> for Result<T, Error> {
    fn nice_unwrap(self) -> T {
        match self {
            Ok(x) => x,
            Err(e) => {
                print_error(&e);
                std::process::exit(1);
            }
        }
    }
}
