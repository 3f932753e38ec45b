//! Console interaction for the no-redirect flow

use crate::{Result, WebAuthNoRedirect};
use std::io::{BufRead, Write};

/// Print the authorization instructions, read one line of input and
/// exchange it for an access token.
pub async fn authorize_interactively<R, W>(
    auth: &WebAuthNoRedirect,
    input: &mut R,
    output: &mut W,
) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "1. Go to: {}", auth.start())?;
    writeln!(output, "2. Click \"Allow\" (you might have to log in first)")?;
    writeln!(output, "3. Copy the authorization code.")?;
    write!(output, "Enter code here: ")?;
    output.flush()?;

    let mut code = String::new();
    input.read_line(&mut code)?;

    auth.finish(&code).await
}
