/// Builds a [`Properties`](crate::Properties) mapping from `key => value` pairs.
///
/// Values may be anything that implements `ToString`.
///
/// # Examples
///
/// ```rust
/// use serde_properties::properties;
///
/// let props = properties! {
///     "server.host" => "localhost",
///     "server.port" => 8080,
///     "debug" => true,
/// };
/// assert_eq!(props.get("server.port"), Some("8080"));
/// assert_eq!(props.len(), 3);
/// ```
#[macro_export]
macro_rules! properties {
    () => {
        $crate::Properties::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut props = $crate::Properties::new();
        $(
            props.insert($key, ::std::string::ToString::to_string(&$value));
        )+
        props
    }};
}

#[cfg(test)]
mod tests {
    use crate::Properties;

    #[test]
    fn test_properties_macro_empty() {
        assert_eq!(properties!(), Properties::new());
    }

    #[test]
    fn test_properties_macro_keeps_order_and_last_value() {
        let props = properties! {
            "b" => 1,
            "a" => 'x',
            "b" => 2.5,
        };
        assert_eq!(props.to_string(), "b=2.5\na=x\n");
    }

    #[test]
    fn test_properties_macro_owned_keys() {
        let prefix = String::from("db");
        let props = properties! { format!("{}.port", prefix) => 5432u16 };
        assert_eq!(props.get("db.port"), Some("5432"));
    }
}
