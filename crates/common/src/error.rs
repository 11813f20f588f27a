/// Error types that can be built from a plain message string.
///
/// Implement this for a crate's error type, then invoke [`impl_context!`]
/// in its error module to get `.context()` and `.with_context()` on `Result`
/// and `Option`.
pub trait FromMessage: Sized {
    fn from_message(message: String) -> Self;
}

/// Generate a crate-local `Context` trait with `.context()` and `.with_context()`
/// methods on `Result` and `Option`.
///
/// Invoke inside a module that defines `Error: FromMessage` and
/// `type Result<T> = std::result::Result<T, Error>`.
///
/// ```ignore
/// // in crates/skills/src/error.rs
/// jovhub_common::impl_context!();
/// ```
#[macro_export]
macro_rules! impl_context {
    () => {
        pub trait Context<T> {
            fn context(self, context: impl Into<String>) -> Result<T>;
            fn with_context<C, F>(self, f: F) -> Result<T>
            where
                C: Into<String>,
                F: FnOnce() -> C;
        }

        impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
            fn context(self, context: impl Into<String>) -> Result<T> {
                let ctx = context.into();
                self.map_err(|source| {
                    <Error as $crate::FromMessage>::from_message(format!("{ctx}: {source}"))
                })
            }

            fn with_context<C, F>(self, f: F) -> Result<T>
            where
                C: Into<String>,
                F: FnOnce() -> C,
            {
                self.map_err(|source| {
                    let ctx = f().into();
                    <Error as $crate::FromMessage>::from_message(format!("{ctx}: {source}"))
                })
            }
        }

        impl<T> Context<T> for Option<T> {
            fn context(self, context: impl Into<String>) -> Result<T> {
                self.ok_or_else(|| <Error as $crate::FromMessage>::from_message(context.into()))
            }

            fn with_context<C, F>(self, f: F) -> Result<T>
            where
                C: Into<String>,
                F: FnOnce() -> C,
            {
                self.ok_or_else(|| <Error as $crate::FromMessage>::from_message(f().into()))
            }
        }
    };
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    mod scoped {
        #[derive(Debug, PartialEq)]
        pub struct Error(pub String);

        impl crate::FromMessage for Error {
            fn from_message(message: String) -> Self {
                Self(message)
            }
        }

        pub type Result<T> = std::result::Result<T, Error>;

        crate::impl_context!();
    }

    use scoped::{Context, Error};

    #[test]
    fn result_context_prefixes_source() {
        let failed: Result<(), &str> = Err("no such file");
        let err = failed.context("reading SKILL.md").unwrap_err();
        assert_eq!(err, Error("reading SKILL.md: no such file".into()));

        let ok: Result<u8, &str> = Ok(7);
        assert_eq!(ok.context("unused").unwrap(), 7);
    }

    #[test]
    fn with_context_is_lazy() {
        let ok: Result<u8, &str> = Ok(1);
        let value = ok
            .with_context(|| -> String { panic!("context built for Ok") })
            .unwrap();
        assert_eq!(value, 1);

        let failed: Result<(), String> = Err("bad".into());
        let err = failed.with_context(|| format!("step {}", 2)).unwrap_err();
        assert_eq!(err.0, "step 2: bad");
    }

    #[test]
    fn option_context_uses_message_alone() {
        let missing: Option<&str> = None;
        assert_eq!(
            missing.context("formula required").unwrap_err(),
            Error("formula required".into())
        );
        assert_eq!(Some("rg").context("unused").unwrap(), "rg");
        let err = None::<u8>.with_context(|| "url required").unwrap_err();
        assert_eq!(err.0, "url required");
    }
}
