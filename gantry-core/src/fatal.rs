/// Report a broken internal invariant and abort.
///
/// Used where two closed sets have drifted apart (for example the menu command
/// names sent by the command source and the ones the router understands).
/// Never use this for operational failures; those belong in the error list.
#[track_caller]
pub fn fatal_error(message: &str) -> ! {
    log::error!("fatal: {message}");
    panic!("{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "menu drift")]
    fn test_fatal_error_panics_with_message() {
        fatal_error("menu drift");
    }
}
