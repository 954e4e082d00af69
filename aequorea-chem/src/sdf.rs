//! SDF / MOL V2000 ingestion.
//!
//! This is the input boundary of the pipeline: it turns a multi-record SD
//! source into well-formed [`Molecule`] graphs with the record's data items
//! in the metadata map. [`SdfReader`] iterates records lazily and can either
//! surface a malformed record as a `Parse` error or skip it, depending on
//! its skip-on-error mode. Restarting simply means constructing a new reader
//! over the source.

use std::io::BufRead;
use std::path::Path;

use aequorea_core::{AequoreaError, Result};

use crate::element::{element_by_number, element_by_symbol};
use crate::molecule::{Bond, BondOrder, MolAtom, Molecule};

/// Parse a MOL V2000 block (up to and including `M  END`) into a `Molecule`.
pub fn parse_mol_v2000(input: &str) -> Result<Molecule> {
    let lines: Vec<&str> = input.lines().collect();

    if lines.len() < 4 {
        return Err(AequoreaError::Parse("MOL block too short".into()));
    }

    // Header: line 0 = molecule name, 1 = program/timestamp, 2 = comment
    let name = lines[0].trim().to_string();

    let counts_line = lines[3];
    if counts_line.len() < 6 {
        return Err(AequoreaError::Parse("counts line too short".into()));
    }
    let num_atoms: usize = counts_line[0..3]
        .trim()
        .parse()
        .map_err(|_| AequoreaError::Parse("invalid atom count".into()))?;
    let num_bonds: usize = counts_line[3..6]
        .trim()
        .parse()
        .map_err(|_| AequoreaError::Parse("invalid bond count".into()))?;

    let atom_start = 4;
    let bond_start = atom_start + num_atoms;
    if lines.len() < bond_start + num_bonds {
        return Err(AequoreaError::Parse("MOL block truncated".into()));
    }

    let mut atoms = Vec::with_capacity(num_atoms);
    for line in &lines[atom_start..bond_start] {
        atoms.push(parse_atom_line(line)?);
    }

    let mut bonds = Vec::with_capacity(num_bonds);
    for line in &lines[bond_start..bond_start + num_bonds] {
        let bond = parse_bond_line(line)?;
        if bond.atom1 >= num_atoms || bond.atom2 >= num_atoms {
            return Err(AequoreaError::Parse(format!(
                "bond references atom {} beyond atom count {num_atoms}",
                bond.atom1.max(bond.atom2) + 1
            )));
        }
        bonds.push(bond);
    }

    // Property block: `M  CHG` supersedes every charge-code column value.
    let mut chg_seen = false;
    for line in &lines[bond_start + num_bonds..] {
        if line.starts_with("M  END") {
            break;
        }
        if line.starts_with("M  CHG") {
            if !chg_seen {
                chg_seen = true;
                for atom in &mut atoms {
                    atom.formal_charge = 0;
                }
            }
            parse_charge_line(line, &mut atoms)?;
        }
    }

    // Aromatic bond type marks its endpoints too.
    for bond in &bonds {
        if bond.is_aromatic {
            atoms[bond.atom1].is_aromatic = true;
            atoms[bond.atom2].is_aromatic = true;
        }
    }

    let mut mol = Molecule::new(name, atoms, bonds);
    fill_implicit_hydrogens(&mut mol);
    Ok(mol)
}

/// Parse one SD record: a MOL block followed by `> <TAG>` data items.
pub fn parse_sd_record(record: &str) -> Result<Molecule> {
    let mut mol = parse_mol_v2000(record)?;

    let mut lines = record.lines();
    for line in lines.by_ref() {
        if line.starts_with("M  END") {
            break;
        }
    }

    let mut tag: Option<String> = None;
    let mut value_lines: Vec<&str> = Vec::new();
    for line in lines {
        if let Some(rest) = line.strip_prefix('>') {
            if let Some(t) = tag.take() {
                mol.metadata.insert(t, value_lines.join("\n"));
                value_lines.clear();
            }
            tag = extract_tag(rest);
        } else if tag.is_some() {
            if line.trim().is_empty() {
                if let Some(t) = tag.take() {
                    mol.metadata.insert(t, value_lines.join("\n"));
                    value_lines.clear();
                }
            } else {
                value_lines.push(line);
            }
        }
    }
    if let Some(t) = tag.take() {
        mol.metadata.insert(t, value_lines.join("\n"));
    }

    Ok(mol)
}

/// Parse a full multi-record SD string, one result per record.
pub fn parse_sdf(input: &str) -> Vec<Result<Molecule>> {
    input
        .split("$$$$")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(parse_sd_record)
        .collect()
}

/// Lazy iterator over the records of an SD source.
///
/// With `skip_on_error` set, malformed records are skipped and iteration
/// continues with the next record; otherwise the parse error is yielded and
/// the caller decides. I/O errors always end the iteration after being
/// reported once.
pub struct SdfReader<R: BufRead> {
    reader: R,
    skip_on_error: bool,
    done: bool,
}

impl<R: BufRead> SdfReader<R> {
    pub fn new(reader: R, skip_on_error: bool) -> Self {
        SdfReader {
            reader,
            skip_on_error,
            done: false,
        }
    }

    /// Read raw lines up to the `$$$$` delimiter (or EOF).
    fn read_record(&mut self) -> Option<Result<String>> {
        let mut record = String::new();
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    if record.trim().is_empty() {
                        return None;
                    }
                    return Some(Ok(record));
                }
                Ok(_) => {
                    if line.trim_end() == "$$$$" {
                        if record.trim().is_empty() {
                            continue;
                        }
                        return Some(Ok(record));
                    }
                    record.push_str(&line);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(AequoreaError::Io(e)));
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for SdfReader<R> {
    type Item = Result<Molecule>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            let parsed = match self.read_record()? {
                Ok(record) => parse_sd_record(&record),
                Err(e) => return Some(Err(e)),
            };
            match parsed {
                Err(_) if self.skip_on_error => continue,
                other => return Some(other),
            }
        }
    }
}

/// Open an SD file as a lazy [`SdfReader`].
pub fn read_sdf_file(
    path: impl AsRef<Path>,
    skip_on_error: bool,
) -> Result<SdfReader<std::io::BufReader<std::fs::File>>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        AequoreaError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    Ok(SdfReader::new(std::io::BufReader::new(file), skip_on_error))
}

fn extract_tag(rest: &str) -> Option<String> {
    let open = rest.find('<')?;
    let close = rest[open + 1..].find('>')?;
    Some(rest[open + 1..open + 1 + close].to_string())
}

fn parse_atom_line(line: &str) -> Result<MolAtom> {
    // V2000 atom line: xxxxx.xxxxyyyyy.yyyyzzzzz.zzzz aaaddcccssshhhbbbvvv...
    if line.len() < 34 {
        return Err(AequoreaError::Parse(format!("atom line too short: '{line}'")));
    }

    let symbol = line[31..34].trim();
    let elem = element_by_symbol(symbol).ok_or_else(|| {
        AequoreaError::Parse(format!("unknown element '{symbol}' in MOL atom block"))
    })?;

    // Old-style charge code column: 0=none, 1=+3, 2=+2, 3=+1, 5=-1, 6=-2, 7=-3
    let charge = if line.len() >= 39 {
        match line[36..39].trim().parse::<u8>() {
            Ok(1) => 3,
            Ok(2) => 2,
            Ok(3) => 1,
            Ok(5) => -1,
            Ok(6) => -2,
            Ok(7) => -3,
            _ => 0,
        }
    } else {
        0
    };

    let mut atom = MolAtom::of_element(elem.atomic_number);
    atom.formal_charge = charge;
    Ok(atom)
}

fn parse_bond_line(line: &str) -> Result<Bond> {
    // V2000 bond line: 111222tttsssxxxrrrccc
    if line.len() < 9 {
        return Err(AequoreaError::Parse(format!("bond line too short: '{line}'")));
    }

    let a1: usize = line[0..3]
        .trim()
        .parse()
        .map_err(|_| AequoreaError::Parse("invalid bond atom1".into()))?;
    let a2: usize = line[3..6]
        .trim()
        .parse()
        .map_err(|_| AequoreaError::Parse("invalid bond atom2".into()))?;
    let bond_type: u8 = line[6..9]
        .trim()
        .parse()
        .map_err(|_| AequoreaError::Parse("invalid bond type".into()))?;

    if a1 == 0 || a2 == 0 {
        return Err(AequoreaError::Parse("bond atom indices must be >= 1".into()));
    }

    let order = match bond_type {
        2 => BondOrder::Double,
        3 => BondOrder::Triple,
        _ => BondOrder::Single,
    };

    Ok(Bond {
        atom1: a1 - 1,
        atom2: a2 - 1,
        order,
        is_aromatic: bond_type == 4,
    })
}

fn parse_charge_line(line: &str, atoms: &mut [MolAtom]) -> Result<()> {
    // M  CHG  n  aaa vvv  aaa vvv ...
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return Ok(());
    }
    let count: usize = parts[2]
        .parse()
        .map_err(|_| AequoreaError::Parse("invalid charge count".into()))?;

    for i in 0..count {
        let idx_pos = 3 + i * 2;
        let val_pos = 4 + i * 2;
        if val_pos >= parts.len() {
            break;
        }
        let atom_idx: usize = parts[idx_pos]
            .parse::<usize>()
            .map_err(|_| AequoreaError::Parse("invalid charge atom index".into()))?
            .saturating_sub(1);
        let charge: i8 = parts[val_pos]
            .parse()
            .map_err(|_| AequoreaError::Parse("invalid charge value".into()))?;
        if atom_idx < atoms.len() {
            atoms[atom_idx].formal_charge = charge;
        }
    }
    Ok(())
}

/// V2000 stores no implicit hydrogen counts; fill them for neutral atoms
/// from the default valence, exactly as the SMILES parser does. Atoms whose
/// hydrogens are already explicit come out at zero because the bonds are
/// counted.
fn fill_implicit_hydrogens(mol: &mut Molecule) {
    for idx in 0..mol.atom_count() {
        let atom = &mol.atoms[idx];
        if atom.formal_charge != 0 {
            continue;
        }
        let Some(valence) =
            element_by_number(atom.atomic_number).and_then(|e| e.default_valence)
        else {
            continue;
        };
        let valence = valence as usize;

        let (available, used) = if atom.is_aromatic {
            (valence.saturating_sub(1), mol.degree(idx))
        } else {
            (valence, mol.bond_order_sum(idx).round() as usize)
        };
        if available > used {
            mol.atoms[idx].implicit_hydrogens = (available - used) as u8;
        }
    }
}
