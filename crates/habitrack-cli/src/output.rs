use serde::Serialize;

/// Print `value` as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(
    value: &T,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
