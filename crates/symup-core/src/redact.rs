//! Masking of credential values before a command line is logged.

/// Flags whose following token is a secret.
pub const CREDENTIAL_FLAGS: [&str; 4] = ["--user", "--password", "--clientId", "--clientSecret"];

/// Replacement for a masked value.
pub const REDACTED: &str = "***";

/// Return a copy of `args` with every credential value masked.
///
/// Handles both `--password secret` and `--password=secret`.
pub fn redact<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    let mut redacted = Vec::with_capacity(args.len());
    let mut mask_next = false;

    for arg in args {
        let arg = arg.as_ref();
        // A flag directly after a flag is not a value; keep masking the next token.
        if CREDENTIAL_FLAGS.contains(&arg) {
            mask_next = true;
            redacted.push(arg.to_string());
        } else if mask_next {
            redacted.push(REDACTED.to_string());
            mask_next = false;
        } else if let Some((flag, _)) = arg
            .split_once('=')
            .filter(|(flag, _)| CREDENTIAL_FLAGS.contains(flag))
        {
            redacted.push(format!("{flag}={REDACTED}"));
        } else {
            redacted.push(arg.to_string());
        }
    }

    redacted
}
