use std::io::Write;

use diagnostics::Diagnostics;
use scanner::Token;

/// Scans and parses `source`, printing the resulting tree to `output`.
///
/// Errors in the source end up in `diagnostics`; the returned error is only used for failures to
/// write the output.
pub fn run(
    source: &str,
    diagnostics: &mut Diagnostics,
    dump_tokens: bool,
    output: &mut impl Write,
) -> anyhow::Result<()> {
    let tokens = scanner::scan(source, diagnostics);

    if dump_tokens {
        for token in &tokens {
            writeln!(output, "{}", describe(token))?;
        }
    }

    // Blank lines at the prompt shouldn't complain about a missing expression
    if let [eof] = tokens.as_slice() {
        log::debug!("Nothing to parse before {eof:?}");
        return Ok(());
    }

    if let Some(expr) = parser::parse(&tokens, diagnostics) {
        if !diagnostics.has_error() {
            writeln!(output, "{expr}")?;
        }
    }

    Ok(())
}

fn describe(token: &Token) -> String {
    match token.literal {
        Some(literal) => format!("{} {} {}", token.kind, token.lexeme, literal),
        None => format!("{} {}", token.kind, token.lexeme).trim_end().to_string(),
    }
}
