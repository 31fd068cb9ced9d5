use super::traits::SpaceGroupFile;
use crate::core::models::asymmetric_unit::AsymmetricUnit;
use crate::core::models::constraint::Constraint;
use crate::core::models::library::SpaceGroupLibrary;
use crate::core::models::site::SiteModel;
use crate::core::models::symmetry::SymmetryOperator;
use nalgebra::{Point3, Vector3};
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

const TERMINATOR: &str = "HALT";

#[derive(Debug, Error)]
pub enum CubicError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: CubicParseErrorKind,
    },
    #[error("Unexpected end of file: missing {0}")]
    MissingRecord(String),
    #[error("Space group '{name}' on line {line} is already defined")]
    DuplicateGroup { line: usize, name: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum CubicParseErrorKind {
    #[error("Invalid {field} (value: '{value}')")]
    InvalidCount { field: &'static str, value: String },
    #[error("Invalid number in {field} (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
    #[error("{record} record needs {expected} fields, found {found}")]
    FieldCount {
        record: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Invalid symmetry scheme '{0}' (expected three of x, y, z; upper case negates)")]
    InvalidScheme(String),
    #[error("Denominator must be non-zero")]
    ZeroDenominator,
}

/// Reader for the `CUBIC.DAT` space-group layout.
///
/// Each group block is its name on a line of its own, followed by a constraint count `n`,
/// `n` constraint lines (`cx cy cz bias`), `n` reverse-symmetry lines, a symmetry count with
/// that many symmetry lines (`scheme tx ty tz denom`), and a site count with that many site
/// lines (`name multiplicity dof bx by bz denom [gx gy gz]...`). Blocks repeat until a `HALT`
/// line or the end of input. Blank lines are ignored.
pub struct CubicDataFile;

impl SpaceGroupFile for CubicDataFile {
    type Error = CubicError;

    fn read_from(reader: &mut impl BufRead) -> Result<SpaceGroupLibrary, Self::Error> {
        let mut records = Records::new(reader.lines());
        let mut library = SpaceGroupLibrary::new();

        while let Some((line, name)) = records.next_record()? {
            if name == TERMINATOR {
                break;
            }
            let unit = read_group(&mut records)?;
            debug!(
                group = %name,
                constraints = unit.constraints().len(),
                symmetries = unit.symmetries().len(),
                sites = unit.sites().count(),
                "Loaded space group."
            );
            if library.insert(&name, unit).is_some() {
                return Err(CubicError::DuplicateGroup { line, name });
            }
        }
        Ok(library)
    }
}

struct Records<I> {
    lines: std::iter::Enumerate<I>,
}

impl<I> Records<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    fn new(lines: I) -> Self {
        Self {
            lines: lines.enumerate(),
        }
    }

    /// Next non-blank line, trimmed, with its 1-based line number.
    fn next_record(&mut self) -> Result<Option<(usize, String)>, CubicError> {
        for (idx, line) in self.lines.by_ref() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some((idx + 1, trimmed.to_string())));
            }
        }
        Ok(None)
    }

    fn expect_record(&mut self, what: &str) -> Result<(usize, String), CubicError> {
        self.next_record()?
            .ok_or_else(|| CubicError::MissingRecord(what.to_string()))
    }

    fn read_many<T>(
        &mut self,
        count: usize,
        what: &str,
        parse: fn(usize, &str) -> Result<T, CubicError>,
    ) -> Result<Vec<T>, CubicError> {
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let (line, content) = self.expect_record(what)?;
            items.push(parse(line, &content)?);
        }
        Ok(items)
    }

    fn read_count(&mut self, what: &'static str) -> Result<usize, CubicError> {
        let (line, content) = self.expect_record(what)?;
        parse_count(line, &content, what)
    }
}

fn read_group<I>(records: &mut Records<I>) -> Result<AsymmetricUnit, CubicError>
where
    I: Iterator<Item = io::Result<String>>,
{
    let n_constraints = records.read_count("constraint count")?;
    let constraints = records.read_many(n_constraints, "constraint", parse_constraint)?;
    let reverse_symmetries =
        records.read_many(n_constraints, "reverse symmetry", parse_symmetry)?;

    let n_symmetries = records.read_count("symmetry count")?;
    let symmetries = records.read_many(n_symmetries, "symmetry", parse_symmetry)?;

    let n_sites = records.read_count("site count")?;
    let sites = records.read_many(n_sites, "site", parse_site)?;

    Ok(AsymmetricUnit::new(
        constraints,
        reverse_symmetries,
        symmetries,
        sites,
    ))
}

fn parse_count(line: usize, value: &str, field: &'static str) -> Result<usize, CubicError> {
    value.parse().map_err(|_| CubicError::Parse {
        line,
        kind: CubicParseErrorKind::InvalidCount {
            field,
            value: value.to_string(),
        },
    })
}

fn parse_floats(line: usize, values: &[&str], field: &'static str) -> Result<Vec<f64>, CubicError> {
    values
        .iter()
        .map(|value| {
            value.parse::<f64>().map_err(|_| CubicError::Parse {
                line,
                kind: CubicParseErrorKind::InvalidFloat {
                    field,
                    value: value.to_string(),
                },
            })
        })
        .collect()
}

fn check_field_count(
    line: usize,
    record: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), CubicError> {
    if found < expected {
        return Err(CubicError::Parse {
            line,
            kind: CubicParseErrorKind::FieldCount {
                record,
                expected,
                found,
            },
        });
    }
    Ok(())
}

fn non_zero(line: usize, denominator: f64) -> Result<f64, CubicError> {
    if denominator == 0.0 {
        return Err(CubicError::Parse {
            line,
            kind: CubicParseErrorKind::ZeroDenominator,
        });
    }
    Ok(denominator)
}

fn parse_constraint(line: usize, content: &str) -> Result<Constraint, CubicError> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    check_field_count(line, "Constraint", 4, fields.len())?;
    let v = parse_floats(line, &fields[..4], "constraint")?;
    Ok(Constraint::new(Vector3::new(v[0], v[1], v[2]), v[3]))
}

fn parse_symmetry(line: usize, content: &str) -> Result<SymmetryOperator, CubicError> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    check_field_count(line, "Symmetry", 5, fields.len())?;
    let scheme = fields[0];
    let v = parse_floats(line, &fields[1..5], "translation")?;
    let denominator = non_zero(line, v[3])?;
    let translation = Vector3::new(v[0], v[1], v[2]) / denominator;

    SymmetryOperator::from_scheme(scheme, translation).ok_or_else(|| CubicError::Parse {
        line,
        kind: CubicParseErrorKind::InvalidScheme(scheme.to_string()),
    })
}

fn parse_site(line: usize, content: &str) -> Result<SiteModel, CubicError> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    check_field_count(line, "Site", 7, fields.len())?;

    let name = fields[0];
    let multiplicity = parse_count(line, fields[1], "site multiplicity")?;
    let dof = parse_count(line, fields[2], "site degrees of freedom")?;

    let required = dof
        .checked_mul(3)
        .and_then(|n| n.checked_add(7))
        .ok_or_else(|| CubicError::Parse {
            line,
            kind: CubicParseErrorKind::InvalidCount {
                field: "site degrees of freedom",
                value: fields[2].to_string(),
            },
        })?;
    check_field_count(line, "Site", required, fields.len())?;
    let v = parse_floats(line, &fields[3..required], "site coordinates")?;

    let denominator = non_zero(line, v[3])?;
    let base = Point3::new(v[0], v[1], v[2]) / denominator;
    let guides = v[4..]
        .chunks_exact(3)
        .map(|g| Vector3::new(g[0], g[1], g[2]) / denominator)
        .collect();

    Ok(SiteModel::new(name, multiplicity, base, guides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::parameters::GenerationParameters;
    use nalgebra::Matrix3;
    use std::io::Cursor;

    const PM3M: &str = "\
Pm3m
4
1 -1 0 -0.000001
0 1 -1 -0.000001
0 0 1 -0.000001
-1 0 0 -0.500001
yxz 0 0 0 1
xzy 0 0 0 1
xyZ 0 0 0 1
Xyz 1 0 0 1
3
yzx 0 0 0 1
yxz 0 0 0 1
Xyz 0 0 0 1
3
a 1 0 0 0 0 1
c 3 0 0 1 1 2
e 6 1 0 0 0 1 1 0 0
";

    fn read_str(content: &str) -> Result<SpaceGroupLibrary, CubicError> {
        CubicDataFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn read_parses_a_complete_group_block() {
        let library = read_str(&format!("{PM3M}HALT\n")).unwrap();
        assert_eq!(library.len(), 1);

        let unit = library.get("Pm3m").unwrap();
        assert_eq!(unit.constraints().len(), 4);
        assert_eq!(unit.reverse_symmetries().len(), 4);
        assert_eq!(unit.symmetries().len(), 3);
        assert_eq!(unit.sites().count(), 3);

        let c = unit.site("c").unwrap();
        assert_eq!(c.expected_atom_count, 3);
        assert_eq!(c.base, Point3::new(0.0, 0.5, 0.5));
        assert_eq!(c.degrees_of_freedom(), 0);

        let e = unit.site("e").unwrap();
        assert_eq!(e.guides, vec![Vector3::new(1.0, 0.0, 0.0)]);
    }

    #[test]
    fn read_divides_translations_by_denominator() {
        let content = "G\n0\n1\nxyz 1 0 3 4\n0\nHALT\n";
        let library = read_str(content).unwrap();
        let op = library.get("G").unwrap().symmetries()[0];
        assert_eq!(op.linear, Matrix3::identity());
        assert_eq!(op.translation, Vector3::new(0.25, 0.0, 0.75));
    }

    #[test]
    fn read_accepts_end_of_file_as_terminator() {
        let library = read_str(PM3M).unwrap();
        assert!(library.get("Pm3m").is_some());
    }

    #[test]
    fn read_stops_at_terminator() {
        let content = format!("{PM3M}HALT\nthis is not parsed\n");
        assert_eq!(read_str(&content).unwrap().len(), 1);
    }

    #[test]
    fn read_multiple_groups_and_skips_blank_lines() {
        let content = "A\n0\n0\n\n1\nx 1 0 0 0 0 1\n\nB\n0\n0\n0\nHALT\n";
        let library = read_str(content).unwrap();
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(library.get("A").unwrap().site("x").unwrap().expected_atom_count, 1);
    }

    #[test]
    fn parsed_group_expands_orbits_inside_unit_cell() {
        let library = read_str(PM3M).unwrap();
        let unit = library.get("Pm3m").unwrap();
        let params = GenerationParameters::new()
            .with("a", vec![])
            .with("e", vec![0.2]);

        let atoms = unit.generate_atoms(&params, true).unwrap();

        assert_eq!(atoms.len(), 7);
        for atom in atoms.iter() {
            assert!(atom.position.iter().all(|&c| (0.0..1.0).contains(&c)));
        }
    }

    #[test]
    fn truncated_block_reports_missing_record() {
        let content = "G\n1\n1 0 0 0\n";
        match read_str(content) {
            Err(CubicError::MissingRecord(what)) => assert_eq!(what, "reverse symmetry"),
            other => panic!("Expected MissingRecord, got {:?}", other),
        }
    }

    #[test]
    fn invalid_count_reports_line_number() {
        let content = "G\nfour\n";
        match read_str(content) {
            Err(CubicError::Parse { line, kind }) => {
                assert_eq!(line, 2);
                assert!(matches!(kind, CubicParseErrorKind::InvalidCount { .. }));
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn invalid_scheme_is_rejected() {
        let content = "G\n0\n1\nxqz 0 0 0 1\n";
        match read_str(content) {
            Err(CubicError::Parse { line, kind }) => {
                assert_eq!(line, 4);
                assert_eq!(kind, CubicParseErrorKind::InvalidScheme("xqz".to_string()));
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let content = "G\n0\n0\n1\nb 8 0 3 3 3 0\n";
        assert!(matches!(
            read_str(content),
            Err(CubicError::Parse {
                line: 5,
                kind: CubicParseErrorKind::ZeroDenominator
            })
        ));
    }

    #[test]
    fn site_with_too_few_guide_components_is_rejected() {
        let content = "G\n0\n0\n1\ne 32 1 0 0 0 1 1 1\n";
        match read_str(content) {
            Err(CubicError::Parse {
                kind: CubicParseErrorKind::FieldCount { expected, found, .. },
                ..
            }) => {
                assert_eq!(expected, 10);
                assert_eq!(found, 9);
            }
            other => panic!("Expected FieldCount error, got {:?}", other),
        }
    }

    #[test]
    fn site_with_overflowing_dof_is_rejected() {
        let content = format!("G\n0\n0\n1\ne 32 {} 0 0 0 1 1 0 0\n", usize::MAX / 2);
        match read_str(&content) {
            Err(CubicError::Parse {
                line: 5,
                kind: CubicParseErrorKind::InvalidCount { field, .. },
            }) => assert_eq!(field, "site degrees of freedom"),
            other => panic!("Expected InvalidCount error, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_group_is_rejected() {
        let content = "G\n0\n0\n0\nG\n0\n0\n0\n";
        assert!(matches!(
            read_str(content),
            Err(CubicError::DuplicateGroup { line: 5, .. })
        ));
    }

    #[test]
    fn bundled_data_file_matches_site_multiplicities() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/CUBIC.DAT");
        let library = CubicDataFile::read_from_path(path).unwrap();
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["Fd3m", "Pm3m"]);

        for (group, unit) in library.iter() {
            for site in unit.sites() {
                let values = vec![0.3; site.degrees_of_freedom()];
                let params = GenerationParameters::new().with(&site.name, values);
                let atoms = unit.generate_atoms(&params, true).unwrap();
                assert_eq!(
                    atoms.len(),
                    site.expected_atom_count,
                    "{group} site {}",
                    site.name
                );
            }
        }
    }

    #[test]
    fn read_from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = CubicDataFile::read_from_path(dir.path().join("CUBIC.DAT"));
        assert!(matches!(result, Err(CubicError::Io(_))));
    }
}
