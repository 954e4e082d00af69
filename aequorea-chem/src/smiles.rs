//! SMILES string parser.

use std::collections::BTreeMap;

use aequorea_core::{AequoreaError, Result};

use crate::element::element_by_symbol;
use crate::molecule::{Bond, BondOrder, MolAtom, Molecule};

/// Parse a SMILES string into a [`Molecule`].
pub fn parse_smiles(smiles: &str) -> Result<Molecule> {
    parse_smiles_named(smiles, "")
}

/// Parse a SMILES string into a [`Molecule`] with a given name.
pub fn parse_smiles_named(smiles: &str, name: &str) -> Result<Molecule> {
    let mut parser = SmilesParser::new(smiles);
    parser.parse()?;
    parser.check_balanced()?;
    parser.fill_implicit_hydrogens();
    Ok(Molecule::new(
        name.to_string(),
        parser.atoms,
        parser.bonds,
    ))
}

/// A bond symbol seen before the atom it attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingBond {
    Order(BondOrder),
    /// The explicit ':' symbol.
    Aromatic,
}

struct SmilesParser<'a> {
    input: &'a [u8],
    pos: usize,
    atoms: Vec<MolAtom>,
    bonds: Vec<Bond>,
    /// Bracket atoms carry their hydrogen count explicitly and are skipped
    /// by the valence-based fill.
    bracket: Vec<bool>,
    /// ring_closures[digit] = (atom_idx, pending bond at the opening side)
    ring_closures: BTreeMap<u16, (usize, Option<PendingBond>)>,
    /// Stack of atom indices for branch handling
    stack: Vec<usize>,
    prev_atom: Option<usize>,
    pending_bond: Option<PendingBond>,
}

impl<'a> SmilesParser<'a> {
    fn new(input: &'a str) -> Self {
        SmilesParser {
            input: input.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            bracket: Vec::new(),
            ring_closures: BTreeMap::new(),
            stack: Vec::new(),
            prev_atom: None,
            pending_bond: None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn parse(&mut self) -> Result<()> {
        while self.pos < self.input.len() {
            match self.peek() {
                Some(b'(') => {
                    self.advance();
                    if let Some(prev) = self.prev_atom {
                        self.stack.push(prev);
                    }
                }
                Some(b')') => {
                    self.advance();
                    self.prev_atom = self.stack.pop();
                    self.pending_bond = None;
                }
                Some(b'-') => {
                    self.advance();
                    self.pending_bond = Some(PendingBond::Order(BondOrder::Single));
                }
                Some(b'=') => {
                    self.advance();
                    self.pending_bond = Some(PendingBond::Order(BondOrder::Double));
                }
                Some(b'#') => {
                    self.advance();
                    self.pending_bond = Some(PendingBond::Order(BondOrder::Triple));
                }
                Some(b':') => {
                    self.advance();
                    self.pending_bond = Some(PendingBond::Aromatic);
                }
                Some(b'/') | Some(b'\\') => {
                    // Cis/trans markers carry no topology; consume and ignore.
                    self.advance();
                }
                Some(b'%') => {
                    self.advance();
                    let ring_num = self.parse_two_digit_ring()?;
                    self.close_or_open_ring(ring_num)?;
                }
                Some(b'[') => {
                    self.parse_bracket_atom()?;
                }
                Some(ch) if ch.is_ascii_digit() => {
                    self.advance();
                    self.close_or_open_ring((ch - b'0') as u16)?;
                }
                Some(ch) if is_organic_atom_start(ch) => {
                    self.parse_organic_atom()?;
                }
                Some(b'.') => {
                    self.advance();
                    self.prev_atom = None;
                    self.pending_bond = None;
                }
                Some(ch) => {
                    return Err(AequoreaError::Parse(format!(
                        "unexpected character '{}' at position {}",
                        ch as char, self.pos
                    )));
                }
                None => break,
            }
        }
        Ok(())
    }

    fn parse_organic_atom(&mut self) -> Result<()> {
        let ch = self.advance().unwrap();
        let is_aromatic = ch.is_ascii_lowercase();
        let upper = ch.to_ascii_uppercase();

        let symbol = match upper {
            b'B' if !is_aromatic && self.peek() == Some(b'r') => {
                self.advance();
                "Br"
            }
            b'B' => "B",
            b'C' if !is_aromatic && self.peek() == Some(b'l') => {
                self.advance();
                "Cl"
            }
            b'C' => "C",
            b'N' => "N",
            b'O' => "O",
            b'P' => "P",
            b'S' if !is_aromatic && self.peek() == Some(b'i') => {
                self.advance();
                "Si"
            }
            b'S' if !is_aromatic && self.peek() == Some(b'e') => {
                self.advance();
                "Se"
            }
            b'S' => "S",
            b'F' => "F",
            b'I' => "I",
            _ => {
                return Err(AequoreaError::Parse(format!(
                    "unknown organic atom '{}'",
                    upper as char
                )));
            }
        };

        let elem = element_by_symbol(symbol)
            .ok_or_else(|| AequoreaError::Parse(format!("unknown element '{symbol}'")))?;

        let mut atom = MolAtom::of_element(elem.atomic_number);
        atom.is_aromatic = is_aromatic;

        let atom_idx = self.atoms.len();
        self.atoms.push(atom);
        self.bracket.push(false);
        self.bond_to_prev(atom_idx);
        self.prev_atom = Some(atom_idx);
        Ok(())
    }

    fn parse_bracket_atom(&mut self) -> Result<()> {
        self.advance(); // consume '['

        let isotope = self.parse_optional_number();

        let ch = self
            .advance()
            .ok_or_else(|| AequoreaError::Parse("unexpected end of SMILES in bracket atom".into()))?;

        let is_aromatic = ch.is_ascii_lowercase();
        let upper = ch.to_ascii_uppercase();

        // Two-letter symbols win when the table knows them.
        let symbol = match self.peek() {
            Some(next) if next.is_ascii_lowercase() => {
                let two_letter = format!("{}{}", upper as char, next as char);
                if element_by_symbol(&two_letter).is_some() {
                    self.advance();
                    two_letter
                } else {
                    String::from(upper as char)
                }
            }
            _ => String::from(upper as char),
        };

        let elem = element_by_symbol(&symbol)
            .ok_or_else(|| AequoreaError::Parse(format!("unknown element '{symbol}'")))?;

        // Tetrahedral markers carry no topology; consume and ignore.
        while self.peek() == Some(b'@') {
            self.advance();
        }

        let mut hydrogen_count = 0u8;
        if self.peek() == Some(b'H') {
            self.advance();
            hydrogen_count = match self.peek() {
                Some(d) if d.is_ascii_digit() => {
                    self.advance();
                    d - b'0'
                }
                _ => 1,
            };
        }

        let charge = self.parse_charge();

        if self.advance() != Some(b']') {
            return Err(AequoreaError::Parse("expected ']' in bracket atom".into()));
        }

        let atom = MolAtom {
            atomic_number: elem.atomic_number,
            formal_charge: charge,
            isotope: isotope.map(|n| n as u16),
            implicit_hydrogens: hydrogen_count,
            is_aromatic,
            atom_type: None,
        };

        let atom_idx = self.atoms.len();
        self.atoms.push(atom);
        self.bracket.push(true);
        self.bond_to_prev(atom_idx);
        self.prev_atom = Some(atom_idx);
        Ok(())
    }

    fn parse_charge(&mut self) -> i8 {
        let sign: i8 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return 0,
        };
        self.advance();

        match self.peek() {
            Some(d) if d.is_ascii_digit() => {
                self.advance();
                sign * (d - b'0') as i8
            }
            _ => {
                // Repeated '+'/'-' symbols ("[Ca++]")
                let mut magnitude = 1i8;
                let repeat = if sign > 0 { b'+' } else { b'-' };
                while self.peek() == Some(repeat) {
                    self.advance();
                    magnitude += 1;
                }
                sign * magnitude
            }
        }
    }

    fn parse_optional_number(&mut self) -> Option<u32> {
        let mut n: u32 = 0;
        let mut found = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
                n = n * 10 + (ch - b'0') as u32;
                found = true;
            } else {
                break;
            }
        }
        found.then_some(n)
    }

    fn parse_two_digit_ring(&mut self) -> Result<u16> {
        let d1 = self
            .advance()
            .ok_or_else(|| AequoreaError::Parse("expected digit after '%'".into()))?;
        let d2 = self
            .advance()
            .ok_or_else(|| AequoreaError::Parse("expected second digit after '%'".into()))?;
        if !d1.is_ascii_digit() || !d2.is_ascii_digit() {
            return Err(AequoreaError::Parse(
                "invalid ring closure number after '%'".into(),
            ));
        }
        Ok((d1 - b'0') as u16 * 10 + (d2 - b'0') as u16)
    }

    fn close_or_open_ring(&mut self, ring_num: u16) -> Result<()> {
        let current = self
            .prev_atom
            .ok_or_else(|| AequoreaError::Parse("ring closure without preceding atom".into()))?;

        if let Some((open_atom, open_bond)) = self.ring_closures.remove(&ring_num) {
            let pending = self.pending_bond.take().or(open_bond);
            self.push_bond(open_atom, current, pending);
        } else {
            self.ring_closures
                .insert(ring_num, (current, self.pending_bond.take()));
        }
        Ok(())
    }

    fn bond_to_prev(&mut self, atom_idx: usize) {
        if let Some(prev) = self.prev_atom {
            let pending = self.pending_bond.take();
            self.push_bond(prev, atom_idx, pending);
        }
        self.pending_bond = None;
    }

    /// Materialize a bond. Aromaticity is a flag: an explicit ':' symbol, or
    /// an unannotated bond between two aromatic atoms, yields a single-order
    /// bond with the aromatic flag set.
    fn push_bond(&mut self, a1: usize, a2: usize, pending: Option<PendingBond>) {
        let both_aromatic = self.atoms[a1].is_aromatic && self.atoms[a2].is_aromatic;
        let (order, is_aromatic) = match pending {
            Some(PendingBond::Order(order)) => (order, false),
            Some(PendingBond::Aromatic) => (BondOrder::Single, true),
            None if both_aromatic => (BondOrder::Single, true),
            None => (BondOrder::Single, false),
        };
        self.bonds.push(Bond {
            atom1: a1,
            atom2: a2,
            order,
            is_aromatic,
        });
    }

    fn check_balanced(&self) -> Result<()> {
        if !self.ring_closures.is_empty() {
            let open: Vec<_> = self.ring_closures.keys().collect();
            return Err(AequoreaError::Parse(format!(
                "unmatched ring closure(s): {open:?}"
            )));
        }
        if !self.stack.is_empty() {
            return Err(AequoreaError::Parse(format!(
                "{} unmatched '(' in SMILES",
                self.stack.len()
            )));
        }
        Ok(())
    }

    /// Fill implicit hydrogen counts for organic-subset atoms from the
    /// element's default valence. Bracket atoms already state their count.
    fn fill_implicit_hydrogens(&mut self) {
        for i in 0..self.atoms.len() {
            if self.bracket[i] {
                continue;
            }
            let atom = &self.atoms[i];
            let valence = crate::element::element_by_number(atom.atomic_number)
                .and_then(|e| e.default_valence);
            let Some(valence) = valence else { continue };
            let valence = valence as usize;

            // Aromatic atoms give one electron to the pi system; their ring
            // bonds each occupy one sigma slot.
            let (available, used) = if atom.is_aromatic {
                (valence.saturating_sub(1), self.degree_of(i))
            } else {
                (valence, self.order_sum_of(i))
            };
            if available > used {
                self.atoms[i].implicit_hydrogens = (available - used) as u8;
            }
        }
    }

    fn degree_of(&self, atom_idx: usize) -> usize {
        self.bonds
            .iter()
            .filter(|b| b.atom1 == atom_idx || b.atom2 == atom_idx)
            .count()
    }

    fn order_sum_of(&self, atom_idx: usize) -> usize {
        let mut total = 0.0f64;
        for bond in &self.bonds {
            if bond.atom1 == atom_idx || bond.atom2 == atom_idx {
                total += if bond.is_aromatic {
                    1.5
                } else {
                    bond.order.as_f64()
                };
            }
        }
        total.round() as usize
    }
}

fn is_organic_atom_start(ch: u8) -> bool {
    matches!(
        ch,
        b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I'
            | b'b' | b'c' | b'n' | b'o' | b'p' | b's'
    )
}
