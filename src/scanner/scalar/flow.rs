/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! This module contains the functions responsible for
//! scanning flow scalars (single and double quoted) into
//! Tokens.
//!
//! Unlike plain and block scalars, flow scalars are always
//! scanned eagerly -- there is no lazy variant, as a quote
//! delimited scalar cannot change its interpretation based
//! on surrounding context the way a plain scalar can.

use crate::{
    scanner::{
        error::{ScanError, ScanResult as Result},
        flag::Flags,
        scalar::escape::flow_unescape,
        stats::MStats,
    },
    token::{ScalarStyle, Token},
};

const SINGLE: u8 = b'\'';
const DOUBLE: u8 = b'"';
const SPACE: u8 = b' ';
const NEWLINE: u8 = b'\n';

/// Scans a flow scalar -- either single or double quoted --
/// returning the Token produced and the amount of .base
/// consumed.
///
/// See:
///     YAML 1.2: Section 7.3.1
///     yaml.org/spec/1.2/#c-quoted-scalar(n,c)
pub(in crate::scanner) fn scan_flow_scalar<'de>(
    opts: Flags,
    base: &'de str,
    stats: &mut MStats,
    single: bool,
) -> Result<(Token<'de>, usize)>
{
    match single
    {
        true => scan_single_quote(opts, base, stats),
        false => scan_double_quote(opts, base, stats),
    }
}

/// Scans a single quoted flow scalar. The only recognized
/// escape inside a single quoted scalar is '' -> ', any
/// other content is taken literally.
///
/// See:
///     YAML 1.2: Section 7.3.1
///     yaml.org/spec/1.2/#single-quoted-style
fn scan_single_quote<'de>(
    opts: Flags,
    base: &'de str,
    stats: &mut MStats,
) -> Result<(Token<'de>, usize)>
{
    let mut buffer = base;
    let mut scratch = Vec::new();
    let mut can_borrow = true;

    // Eat left quote
    cache!(~buffer, 1, opts)?;
    advance!(buffer, :stats, 1);

    'scalar: loop
    {
        cache!(~buffer, 4, opts)?;

        // Even in a scalar context, YAML prohibits starting a line
        // with document stream tokens followed by a blank
        // character
        if stats.column == 0
            && check!(~buffer => [b'-', b'-', b'-', ..] | [b'.', b'.', b'.', ..])
            && isWhiteSpaceZ!(~buffer, 3)
        {
            return Err(ScanError::InvalidFlowScalar);
        }

        cache!(~buffer, 1, opts)?;
        if buffer.is_empty()
        {
            return Err(ScanError::UnexpectedEOF);
        }

        // Consume non whitespace characters
        while !isWhiteSpaceZ!(~buffer)
        {
            cache!(~buffer, 2, opts)?;

            // An escaped quote ('') unescapes to a single '. As soon
            // as we hit one we can no longer borrow from .base
            if check!(~buffer => [SINGLE, SINGLE, ..])
            {
                set_no_borrow(&mut can_borrow, base, buffer, &mut scratch);

                scratch.push(SINGLE);
                advance!(buffer, :stats, 2);
                continue;
            }

            // We're done, we hit the right quote
            if check!(~buffer => [SINGLE, ..])
            {
                break 'scalar;
            }

            if !can_borrow
            {
                scratch.push(buffer.as_bytes()[0])
            }
            advance!(buffer, :stats, 1);
        }

        // Consume whitespace, folding line breaks as required
        let mut lines = 0;
        let mut whitespace = 0;

        loop
        {
            cache!(~buffer, 1, opts)?;

            match (isBlank!(~buffer), isBreak!(~buffer))
            {
                (false, false) => break,
                (true, _) =>
                {
                    if !can_borrow
                    {
                        scratch.push(buffer.as_bytes()[0])
                    }
                    whitespace += 1;
                    advance!(buffer, :stats, 1);
                },
                (false, _) =>
                {
                    set_no_borrow(&mut can_borrow, base, buffer, &mut scratch);

                    lines += 1;
                    whitespace = 0;
                    advance!(buffer, :stats, @line);
                },
            }
        }

        join_lines(lines, whitespace, &mut scratch);
    }

    let token = match can_borrow
    {
        true =>
        {
            // Safety: we must be on a code point boundary, as the only
            // way to get here is:
            //
            // 1. .base->0 must be a quote
            // 2. .base->.buffer.len() - 1 must be a quote
            // 3. .base must be valid UTF8 (its a str)
            let fragment = base.get(1..base.len() - buffer.len()).unwrap();

            Token::Scalar(cow!(fragment), ScalarStyle::SingleQuote)
        },
        false =>
        {
            // Safety: characters added to scratch are either added
            // from a str (.base) or are valid UTF8 single quote
            // escapes
            let fragment = std::str::from_utf8(&scratch).unwrap();

            Token::Scalar(cow!(fragment.to_owned()), ScalarStyle::SingleQuote)
        },
    };

    // Eat the right quote
    cache!(~buffer, 1, opts)?;
    advance!(buffer, :stats, 1);

    let advance = base.len() - buffer.len();

    Ok((token, advance))
}

/// Scans a double quoted flow scalar. Double quoted scalars
/// support the full range of YAML escape sequences -- see
/// [`flow_unescape`][escape] -- and may also fold line
/// breaks the same way single quoted scalars do.
///
/// See:
///     YAML 1.2: Section 7.3.1
///     yaml.org/spec/1.2/#double-quoted-style
fn scan_double_quote<'de>(
    opts: Flags,
    base: &'de str,
    stats: &mut MStats,
) -> Result<(Token<'de>, usize)>
{
    let mut buffer = base;
    let mut scratch = Vec::new();
    let mut can_borrow = true;

    // Eat left quote
    cache!(~buffer, 1, opts)?;
    advance!(buffer, :stats, 1);

    'scalar: loop
    {
        cache!(~buffer, 4, opts)?;

        if stats.column == 0
            && check!(~buffer => [b'-', b'-', b'-', ..] | [b'.', b'.', b'.', ..])
            && isWhiteSpaceZ!(~buffer, 3)
        {
            return Err(ScanError::InvalidFlowScalar);
        }

        cache!(~buffer, 1, opts)?;
        if buffer.is_empty()
        {
            return Err(ScanError::UnexpectedEOF);
        }

        // Consume non whitespace characters
        while !isWhiteSpaceZ!(~buffer)
        {
            cache!(~buffer, 1, opts)?;

            // We're done, we hit the right quote
            if check!(~buffer => [DOUBLE, ..])
            {
                break 'scalar;
            }

            // An escape sequence, unescape it directly into .scratch.
            // A '\' followed immediately by a line break is a
            // special escape that folds away the break entirely
            // (and any leading whitespace on the following line)
            if check!(~buffer => [b'\\', ..])
            {
                set_no_borrow(&mut can_borrow, base, buffer, &mut scratch);

                cache!(~buffer, 2, opts)?;
                if isBreak!(~buffer, 1)
                {
                    advance!(buffer, :stats, 1);
                    advance!(buffer, :stats, @line);

                    skip_leading_blanks(opts, &mut buffer, stats)?;

                    continue;
                }

                let amt = flow_unescape(buffer, &mut scratch)?;
                advance!(buffer, :stats, amt);

                continue;
            }

            if !can_borrow
            {
                scratch.push(buffer.as_bytes()[0])
            }
            advance!(buffer, :stats, 1);
        }

        // Consume whitespace, folding line breaks as required
        let mut lines = 0;
        let mut whitespace = 0;

        loop
        {
            cache!(~buffer, 1, opts)?;

            match (isBlank!(~buffer), isBreak!(~buffer))
            {
                (false, false) => break,
                (true, _) =>
                {
                    if !can_borrow
                    {
                        scratch.push(buffer.as_bytes()[0])
                    }
                    whitespace += 1;
                    advance!(buffer, :stats, 1);
                },
                (false, _) =>
                {
                    set_no_borrow(&mut can_borrow, base, buffer, &mut scratch);

                    lines += 1;
                    whitespace = 0;
                    advance!(buffer, :stats, @line);
                },
            }
        }

        join_lines(lines, whitespace, &mut scratch);
    }

    let token = match can_borrow
    {
        true =>
        {
            let fragment = base.get(1..base.len() - buffer.len()).unwrap();

            Token::Scalar(cow!(fragment), ScalarStyle::DoubleQuote)
        },
        false =>
        {
            let fragment = std::str::from_utf8(&scratch).unwrap();

            Token::Scalar(cow!(fragment.to_owned()), ScalarStyle::DoubleQuote)
        },
    };

    // Eat the right quote
    cache!(~buffer, 1, opts)?;
    advance!(buffer, :stats, 1);

    let advance = base.len() - buffer.len();

    Ok((token, advance))
}

/// Skip leading blanks (but not breaks) on the line
/// following an escaped line break inside a double quoted
/// scalar.
fn skip_leading_blanks(
    opts: Flags,
    buffer: &mut &str,
    stats: &mut MStats,
) -> Result<()>
{
    cache!(~buffer, 1, opts)?;

    while isBlank!(~buffer)
    {
        advance!(*buffer, :stats, 1);
        cache!(~buffer, 1, opts)?;
    }

    Ok(())
}

/// Handles the trap door from borrowing to copying,
/// extending .scratch with everything read from .base so
/// far.
fn set_no_borrow(can_borrow: &mut bool, base: &str, buffer: &str, scratch: &mut Vec<u8>)
{
    if *can_borrow
    {
        scratch.extend_from_slice(base[0..base.len() - buffer.len()].as_bytes());
    }

    *can_borrow = false
}

/// Fold accumulated whitespace / line breaks into .scratch
/// per the YAML line folding rule:
///
///     e.g ===================
///      'a                  'a
///       b                   b
///       c
///       d'                  c'
///       -> 'a b c d'        -> 'a b \nc'
///
/// A single line break folds to a space. Two or more fold to
/// (n - 1) literal line breaks, as the line break separating
/// the last non blank character from the first blank is
/// always discarded.
fn join_lines(lines: usize, whitespace: usize, scratch: &mut Vec<u8>)
{
    match lines
    {
        0 =>
        {},
        1 =>
        {
            scratch.truncate(scratch.len() - whitespace);
            scratch.push(SPACE);
        },
        n =>
        {
            scratch.truncate(scratch.len() - whitespace);

            for _ in 0..n - 1
            {
                scratch.push(NEWLINE)
            }
        },
    }
}

#[cfg(test)]
mod tests
{
    use anyhow::bail;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::scanner::scalar::test_utils::TEST_FLAGS;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn flow_single_empty() -> TestResult
    {
        let data = "''";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!(""), ScalarStyle::SingleQuote);

        let (scalar, read) = scan_single_quote(TEST_FLAGS, data, &mut stats)?;

        assert_eq!(read, 2);

        if !(scalar == expected)
        {
            bail!("expected\n{:?}\nbut got\n{:?}", expected, &scalar)
        }

        Ok(())
    }

    #[test]
    fn flow_single_simple() -> TestResult
    {
        let data = "'hello world'";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("hello world"), ScalarStyle::SingleQuote);

        let (scalar, read) = scan_single_quote(TEST_FLAGS, data, &mut stats)?;

        assert_eq!(read, 13);

        if !(scalar == expected)
        {
            bail!("expected\n{:?}\nbut got\n{:?}", expected, &scalar)
        }

        Ok(())
    }

    #[test]
    fn flow_single_escaped_quote() -> TestResult
    {
        let data = "'it''s here'";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("it's here"), ScalarStyle::SingleQuote);

        let (scalar, read) = scan_single_quote(TEST_FLAGS, data, &mut stats)?;

        assert_eq!(read, data.len());

        if !(scalar == expected)
        {
            bail!("expected\n{:?}\nbut got\n{:?}", expected, &scalar)
        }

        Ok(())
    }

    #[test]
    fn flow_single_line_join() -> TestResult
    {
        let data = "'a\nb\nc\nd'";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("a b c d"), ScalarStyle::SingleQuote);

        let (scalar, _read) = scan_single_quote(TEST_FLAGS, data, &mut stats)?;

        if !(scalar == expected)
        {
            bail!("expected\n{:?}\nbut got\n{:?}", expected, &scalar)
        }

        Ok(())
    }

    #[test]
    fn flow_single_line_join_with_blank_line() -> TestResult
    {
        let data = "'a\n\nb'";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("a\nb"), ScalarStyle::SingleQuote);

        let (scalar, _read) = scan_single_quote(TEST_FLAGS, data, &mut stats)?;

        if !(scalar == expected)
        {
            bail!("expected\n{:?}\nbut got\n{:?}", expected, &scalar)
        }

        Ok(())
    }

    #[test]
    fn flow_single_reject_document()
    {
        let data = ["'--- '", "'---\n'"];
        let mut stats = MStats::new();
        let expected = ScanError::InvalidFlowScalar;

        for (i, &t) in (&data).into_iter().enumerate()
        {
            match scan_single_quote(TEST_FLAGS, t, &mut stats)
            {
                Err(e) => assert_eq!(
                    e, expected,
                    "on iteration {}, expected error {}, got {}",
                    i, expected, e
                ),
                Ok((unexpected, _)) => panic!(
                    "on iteration {}, expected error {}, got unexpected value {:?}",
                    i, expected, unexpected
                ),
            }
        }
    }

    #[test]
    fn flow_single_reject_eof()
    {
        let data = ["'end space ", "'", "'end word"];
        let mut stats = MStats::new();
        let expected = ScanError::UnexpectedEOF;

        for (i, &t) in (&data).into_iter().enumerate()
        {
            match scan_single_quote(TEST_FLAGS, t, &mut stats)
            {
                Err(e) => assert_eq!(
                    e, expected,
                    "on iteration {}, expected error {}, got {}",
                    i, expected, e
                ),
                Ok((unexpected, _)) => panic!(
                    "on iteration {}, expected error {}, got unexpected value {:?}",
                    i, expected, unexpected
                ),
            }
        }
    }

    #[test]
    fn flow_double_simple() -> TestResult
    {
        let data = "\"hello world\"";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("hello world"), ScalarStyle::DoubleQuote);

        let (scalar, read) = scan_double_quote(TEST_FLAGS, data, &mut stats)?;

        assert_eq!(read, data.len());

        if !(scalar == expected)
        {
            bail!("expected\n{:?}\nbut got\n{:?}", expected, &scalar)
        }

        Ok(())
    }

    #[test]
    fn flow_double_special_escapes() -> TestResult
    {
        let data = r#""a\nb\tc""#;
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("a\nb\tc"), ScalarStyle::DoubleQuote);

        let (scalar, _read) = scan_double_quote(TEST_FLAGS, data, &mut stats)?;

        if !(scalar == expected)
        {
            bail!("expected\n{:?}\nbut got\n{:?}", expected, &scalar)
        }

        Ok(())
    }

    #[test]
    fn flow_double_unicode_escape() -> TestResult
    {
        let data = r#""\x41B\U00000043""#;
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("ABC"), ScalarStyle::DoubleQuote);

        let (scalar, _read) = scan_double_quote(TEST_FLAGS, data, &mut stats)?;

        if !(scalar == expected)
        {
            bail!("expected\n{:?}\nbut got\n{:?}", expected, &scalar)
        }

        Ok(())
    }

    #[test]
    fn flow_double_escaped_line_break_is_folded_away() -> TestResult
    {
        let data = "\"a\\\nb\"";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("ab"), ScalarStyle::DoubleQuote);

        let (scalar, _read) = scan_double_quote(TEST_FLAGS, data, &mut stats)?;

        if !(scalar == expected)
        {
            bail!("expected\n{:?}\nbut got\n{:?}", expected, &scalar)
        }

        Ok(())
    }

    #[test]
    fn flow_double_line_join() -> TestResult
    {
        let data = "\"a\nb\nc\nd\"";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("a b c d"), ScalarStyle::DoubleQuote);

        let (scalar, _read) = scan_double_quote(TEST_FLAGS, data, &mut stats)?;

        if !(scalar == expected)
        {
            bail!("expected\n{:?}\nbut got\n{:?}", expected, &scalar)
        }

        Ok(())
    }

    #[test]
    fn flow_double_reject_eof()
    {
        let data = ["\"end space ", "\"", "\"end word"];
        let mut stats = MStats::new();
        let expected = ScanError::UnexpectedEOF;

        for (i, &t) in (&data).into_iter().enumerate()
        {
            match scan_double_quote(TEST_FLAGS, t, &mut stats)
            {
                Err(e) => assert_eq!(
                    e, expected,
                    "on iteration {}, expected error {}, got {}",
                    i, expected, e
                ),
                Ok((unexpected, _)) => panic!(
                    "on iteration {}, expected error {}, got unexpected value {:?}",
                    i, expected, unexpected
                ),
            }
        }
    }
}
