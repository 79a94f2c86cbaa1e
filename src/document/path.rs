//! Path data mini-language: number scanning and command interpretation.
//!
//! Supported commands are `M`, `L`, `H`, `V`, `C` and `Z` in absolute
//! (uppercase) and relative (lowercase) form. Other command letters are
//! reported as warnings and skipped; interpretation continues with the next
//! command.

use crate::draw::shape::PathBuilder;
use crate::geometry::Point;
use log::warn;
use std::fmt;

/// Non-fatal problems found while interpreting path data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathWarning {
    /// A command letter this interpreter does not know
    UnsupportedCommand(char),
    /// Trailing numbers that do not fill a whole argument group
    IncompleteArguments {
        command: char,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for PathWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathWarning::UnsupportedCommand(c) => write!(f, "path command '{c}' not supported"),
            PathWarning::IncompleteArguments {
                command,
                expected,
                found,
            } => write!(
                f,
                "path command '{command}' takes groups of {expected} numbers, {found} left over"
            ),
        }
    }
}

/// Extracts every number from `text`.
///
/// Numbers may be signed, decimal and carry an exponent. No separator is
/// required between numbers: a sign or a second decimal point starts the next
/// one (`"122e-1-20"` → `[12.2, -20.0]`, `"1.5.5"` → `[1.5, 0.5]`). Characters
/// that cannot start a number are skipped.
pub fn parse_coords(text: &str) -> Vec<f64> {
    let bytes = text.as_bytes();
    let mut numbers = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match scan_number(bytes, i) {
            Some((value, end)) => {
                numbers.push(value);
                i = end;
            }
            None => i += 1,
        }
    }

    numbers
}

fn scan_number(bytes: &[u8], start: usize) -> Option<(f64, usize)> {
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut i = start;
    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_end = digits_from(i);
    let has_int = int_end > i;
    i = int_end;

    let mut has_frac = false;
    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        has_frac = frac_end > i + 1;
        if has_int || has_frac {
            i = frac_end;
        }
    }

    if !has_int && !has_frac {
        return None;
    }

    // exponent only counts when digits follow it
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }

    let text = std::str::from_utf8(&bytes[start..i]).ok()?;
    Some((text.parse().ok()?, i))
}

fn is_command(c: char) -> bool {
    c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')
}

/// Splits path data into (command letter, argument text) segments.
fn segments(data: &str) -> Vec<(char, &str)> {
    let mut out = Vec::new();
    let mut current: Option<(char, usize)> = None;

    for (pos, c) in data.char_indices() {
        if !is_command(c) {
            continue;
        }
        if let Some((command, from)) = current {
            out.push((command, &data[from..pos]));
        }
        current = Some((c, pos + c.len_utf8()));
    }
    if let Some((command, from)) = current {
        out.push((command, &data[from..]));
    }

    out
}

/// Runs path data against a builder, returning the warnings encountered.
pub fn interpret(data: &str, builder: &mut PathBuilder) -> Vec<PathWarning> {
    let mut warnings = Vec::new();

    for (command, args) in segments(data) {
        let numbers = parse_coords(args);
        let relative = command.is_ascii_lowercase();

        let arity = match command.to_ascii_uppercase() {
            'M' | 'L' => 2,
            'H' | 'V' => 1,
            'C' => 6,
            'Z' => {
                builder.close();
                continue;
            }
            _ => {
                warn!("Path command '{command}' not supported, skipping");
                warnings.push(PathWarning::UnsupportedCommand(command));
                continue;
            }
        };

        let groups = numbers.chunks_exact(arity);
        let leftover = groups.remainder().len();
        if leftover > 0 || numbers.is_empty() {
            let warning = PathWarning::IncompleteArguments {
                command,
                expected: arity,
                found: leftover,
            };
            warn!("{warning}");
            warnings.push(warning);
        }

        for (index, group) in groups.enumerate() {
            apply(builder, command, relative, index, group);
        }
    }

    warnings
}

fn apply(builder: &mut PathBuilder, command: char, relative: bool, index: usize, args: &[f64]) {
    match command.to_ascii_uppercase() {
        // pairs after the first one are implicit line-tos
        'M' if index == 0 => builder.move_to(Point::new(args[0], args[1]), relative),
        'M' | 'L' => builder.line_to(Point::new(args[0], args[1]), relative),
        // absolute H/V keep the other pen coordinate; relative ones offset it
        'H' if relative => builder.line_to(Point::new(args[0], 0.0), true),
        'H' => builder.line_to(Point::new(args[0], builder.pen().y), false),
        'V' if relative => builder.line_to(Point::new(0.0, args[0]), true),
        'V' => builder.line_to(Point::new(builder.pen().x, args[0]), false),
        'C' => builder.curve_to(
            Point::new(args[0], args[1]),
            Point::new(args[2], args[3]),
            Point::new(args[4], args[5]),
            relative,
        ),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Shape;

    fn subpaths(data: &str) -> (Vec<Vec<(f64, f64)>>, Vec<PathWarning>) {
        let mut builder = PathBuilder::new();
        let warnings = interpret(data, &mut builder);
        let Shape::Path { subpaths } = builder.finish() else {
            unreachable!()
        };
        let tuples = subpaths
            .into_iter()
            .map(|sp| sp.into_iter().map(|p| (p.x, p.y)).collect())
            .collect();
        (tuples, warnings)
    }

    #[test]
    fn coords_with_various_separators() {
        assert_eq!(parse_coords("120 200"), vec![120.0, 200.0]);
        assert_eq!(parse_coords("12.0,20.0"), vec![12.0, 20.0]);
        assert_eq!(parse_coords("12-20"), vec![12.0, -20.0]);
        assert_eq!(parse_coords("122e-1, -20"), vec![12.2, -20.0]);
        assert_eq!(parse_coords("122e-1-20"), vec![12.2, -20.0]);
    }

    #[test]
    fn coords_edge_cases() {
        assert_eq!(parse_coords("12e1"), vec![120.0]);
        assert_eq!(parse_coords("-12-24,-41"), vec![-12.0, -24.0, -41.0]);
        assert_eq!(parse_coords("1.5.5"), vec![1.5, 0.5]);
        assert_eq!(parse_coords("+.5e+1 3."), vec![5.0, 3.0]);
        assert_eq!(parse_coords("2e"), vec![2.0]);
        assert!(parse_coords(" , - . ").is_empty());
    }

    #[test]
    fn straight_line_commands() {
        let (paths, warnings) = subpaths("M2 5 H20 L10 3.4 V15 Z");
        assert!(warnings.is_empty());
        assert_eq!(
            paths,
            vec![vec![(2.0, 5.0), (20.0, 5.0), (10.0, 3.4), (10.0, 15.0), (2.0, 5.0)]]
        );
    }

    #[test]
    fn relative_commands_follow_the_pen() {
        let (paths, _) = subpaths("M2 5 H20 L10 34e-1 V15 Z m2 5 h20 l10-30 v15 z");
        assert_eq!(paths.len(), 2);
        assert_eq!(
            paths[1],
            vec![(4.0, 10.0), (24.0, 10.0), (34.0, -20.0), (34.0, -5.0), (4.0, 10.0)]
        );
    }

    #[test]
    fn relative_move_after_absolute_subpath() {
        let (paths, _) = subpaths("M0 0 L10 20 m10 20");
        assert_eq!(paths[1], vec![(20.0, 40.0)]);
    }

    #[test]
    fn repeated_groups_and_implicit_lineto() {
        let (paths, warnings) = subpaths("M0 0 10 0 10 10 L 0 10 0 5");
        assert!(warnings.is_empty());
        assert_eq!(
            paths[0],
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 5.0)]
        );
    }

    #[test]
    fn every_close_command_repeats_the_start() {
        let (paths, _) = subpaths("M0 0 L10 0 L10 10 Z Z");
        assert_eq!(paths.len(), 1);
        assert_eq!(
            paths[0],
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0), (0.0, 0.0)]
        );
    }

    #[test]
    fn curve_command_appends_flattened_points() {
        let (paths, _) = subpaths("M0 0 C0 10 10 10 10 0");
        assert_eq!(paths[0].len(), 11);
        let end = paths[0][10];
        assert!((end.0 - 10.0).abs() < 1e-9 && end.1.abs() < 1e-9);
    }

    #[test]
    fn unsupported_command_warns_and_continues() {
        let (paths, warnings) = subpaths("M0 0 Q 5 5 10 0 L 10 10");
        assert_eq!(warnings, vec![PathWarning::UnsupportedCommand('Q')]);
        assert_eq!(paths[0], vec![(0.0, 0.0), (10.0, 10.0)]);
    }

    #[test]
    fn incomplete_group_is_reported() {
        let (paths, warnings) = subpaths("M0 0 L 5 5 7");
        assert_eq!(
            warnings,
            vec![PathWarning::IncompleteArguments {
                command: 'L',
                expected: 2,
                found: 1
            }]
        );
        assert_eq!(paths[0], vec![(0.0, 0.0), (5.0, 5.0)]);
    }
}
