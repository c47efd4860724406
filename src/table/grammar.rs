use winnow::ascii::line_ending;
use winnow::combinator::{alt, cut_err, opt, separated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::take_while;

// -- Fields -----------------------------------------------------------------

fn quoted(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut out = String::new();
    loop {
        let chunk = take_while(0.., |c: char| c != '"').parse_next(input)?;
        out.push_str(chunk);
        cut_err('"')
            .context(StrContext::Expected(StrContextValue::Description(
                "closing quote",
            )))
            .parse_next(input)?;
        // A doubled quote is an escaped literal quote.
        if opt('"').parse_next(input)?.is_none() {
            return Ok(out);
        }
        out.push('"');
    }
}

fn bare_field<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    let raw = take_while(0.., |c: char| c != ',' && c != '\n').parse_next(input)?;
    Ok(raw.strip_suffix('\r').unwrap_or(raw))
}

/// Text between a closing quote and the next separator is kept verbatim,
/// so `"bad"x` reads as `badx` instead of failing the whole table.
fn quoted_field(input: &mut &str) -> ModalResult<String> {
    let mut value = quoted.parse_next(input)?;
    value.push_str(bare_field.parse_next(input)?);
    Ok(value)
}

fn field(input: &mut &str) -> ModalResult<String> {
    alt((quoted_field, bare_field.map(str::to_owned))).parse_next(input)
}

// -- Rows -------------------------------------------------------------------

fn row(input: &mut &str) -> ModalResult<Vec<String>> {
    separated(1.., field, ',').parse_next(input)
}

/// All non-blank rows, header included. A leading byte-order mark is dropped.
pub(super) fn table(input: &mut &str) -> ModalResult<Vec<Vec<String>>> {
    opt('\u{feff}').parse_next(input)?;
    let rows: Vec<Vec<String>> = separated(1.., row, line_ending).parse_next(input)?;
    Ok(rows
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect())
}
