//! Periodic table data and element lookup.

/// A chemical element from the periodic table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub atomic_number: u8,
    pub symbol: &'static str,
    pub name: &'static str,
    pub atomic_weight: f64,
    /// Usual valence used when filling implicit hydrogens; `None` for
    /// elements that never receive implicit hydrogens (metals, noble gases).
    pub default_valence: Option<u8>,
    /// Pauling electronegativity; 0.0 where no accepted value exists.
    pub electronegativity: f64,
}

/// Elements 1–54 (H through Xe).
static ELEMENTS: [Element; 54] = [
    Element { atomic_number: 1, symbol: "H", name: "Hydrogen", atomic_weight: 1.008, default_valence: Some(1), electronegativity: 2.20 },
    Element { atomic_number: 2, symbol: "He", name: "Helium", atomic_weight: 4.003, default_valence: None, electronegativity: 0.0 },
    Element { atomic_number: 3, symbol: "Li", name: "Lithium", atomic_weight: 6.941, default_valence: None, electronegativity: 0.98 },
    Element { atomic_number: 4, symbol: "Be", name: "Beryllium", atomic_weight: 9.012, default_valence: None, electronegativity: 1.57 },
    Element { atomic_number: 5, symbol: "B", name: "Boron", atomic_weight: 10.81, default_valence: Some(3), electronegativity: 2.04 },
    Element { atomic_number: 6, symbol: "C", name: "Carbon", atomic_weight: 12.011, default_valence: Some(4), electronegativity: 2.55 },
    Element { atomic_number: 7, symbol: "N", name: "Nitrogen", atomic_weight: 14.007, default_valence: Some(3), electronegativity: 3.04 },
    Element { atomic_number: 8, symbol: "O", name: "Oxygen", atomic_weight: 15.999, default_valence: Some(2), electronegativity: 3.44 },
    Element { atomic_number: 9, symbol: "F", name: "Fluorine", atomic_weight: 18.998, default_valence: Some(1), electronegativity: 3.98 },
    Element { atomic_number: 10, symbol: "Ne", name: "Neon", atomic_weight: 20.180, default_valence: None, electronegativity: 0.0 },
    Element { atomic_number: 11, symbol: "Na", name: "Sodium", atomic_weight: 22.990, default_valence: None, electronegativity: 0.93 },
    Element { atomic_number: 12, symbol: "Mg", name: "Magnesium", atomic_weight: 24.305, default_valence: None, electronegativity: 1.31 },
    Element { atomic_number: 13, symbol: "Al", name: "Aluminum", atomic_weight: 26.982, default_valence: None, electronegativity: 1.61 },
    Element { atomic_number: 14, symbol: "Si", name: "Silicon", atomic_weight: 28.086, default_valence: Some(4), electronegativity: 1.90 },
    Element { atomic_number: 15, symbol: "P", name: "Phosphorus", atomic_weight: 30.974, default_valence: Some(3), electronegativity: 2.19 },
    Element { atomic_number: 16, symbol: "S", name: "Sulfur", atomic_weight: 32.06, default_valence: Some(2), electronegativity: 2.58 },
    Element { atomic_number: 17, symbol: "Cl", name: "Chlorine", atomic_weight: 35.45, default_valence: Some(1), electronegativity: 3.16 },
    Element { atomic_number: 18, symbol: "Ar", name: "Argon", atomic_weight: 39.948, default_valence: None, electronegativity: 0.0 },
    Element { atomic_number: 19, symbol: "K", name: "Potassium", atomic_weight: 39.098, default_valence: None, electronegativity: 0.82 },
    Element { atomic_number: 20, symbol: "Ca", name: "Calcium", atomic_weight: 40.078, default_valence: None, electronegativity: 1.00 },
    Element { atomic_number: 21, symbol: "Sc", name: "Scandium", atomic_weight: 44.956, default_valence: None, electronegativity: 1.36 },
    Element { atomic_number: 22, symbol: "Ti", name: "Titanium", atomic_weight: 47.867, default_valence: None, electronegativity: 1.54 },
    Element { atomic_number: 23, symbol: "V", name: "Vanadium", atomic_weight: 50.942, default_valence: None, electronegativity: 1.63 },
    Element { atomic_number: 24, symbol: "Cr", name: "Chromium", atomic_weight: 51.996, default_valence: None, electronegativity: 1.66 },
    Element { atomic_number: 25, symbol: "Mn", name: "Manganese", atomic_weight: 54.938, default_valence: None, electronegativity: 1.55 },
    Element { atomic_number: 26, symbol: "Fe", name: "Iron", atomic_weight: 55.845, default_valence: None, electronegativity: 1.83 },
    Element { atomic_number: 27, symbol: "Co", name: "Cobalt", atomic_weight: 58.933, default_valence: None, electronegativity: 1.88 },
    Element { atomic_number: 28, symbol: "Ni", name: "Nickel", atomic_weight: 58.693, default_valence: None, electronegativity: 1.91 },
    Element { atomic_number: 29, symbol: "Cu", name: "Copper", atomic_weight: 63.546, default_valence: None, electronegativity: 1.90 },
    Element { atomic_number: 30, symbol: "Zn", name: "Zinc", atomic_weight: 65.38, default_valence: None, electronegativity: 1.65 },
    Element { atomic_number: 31, symbol: "Ga", name: "Gallium", atomic_weight: 69.723, default_valence: None, electronegativity: 1.81 },
    Element { atomic_number: 32, symbol: "Ge", name: "Germanium", atomic_weight: 72.63, default_valence: Some(4), electronegativity: 2.01 },
    Element { atomic_number: 33, symbol: "As", name: "Arsenic", atomic_weight: 74.922, default_valence: Some(3), electronegativity: 2.18 },
    Element { atomic_number: 34, symbol: "Se", name: "Selenium", atomic_weight: 78.96, default_valence: Some(2), electronegativity: 2.55 },
    Element { atomic_number: 35, symbol: "Br", name: "Bromine", atomic_weight: 79.904, default_valence: Some(1), electronegativity: 2.96 },
    Element { atomic_number: 36, symbol: "Kr", name: "Krypton", atomic_weight: 83.798, default_valence: None, electronegativity: 3.00 },
    Element { atomic_number: 37, symbol: "Rb", name: "Rubidium", atomic_weight: 85.468, default_valence: None, electronegativity: 0.82 },
    Element { atomic_number: 38, symbol: "Sr", name: "Strontium", atomic_weight: 87.62, default_valence: None, electronegativity: 0.95 },
    Element { atomic_number: 39, symbol: "Y", name: "Yttrium", atomic_weight: 88.906, default_valence: None, electronegativity: 1.22 },
    Element { atomic_number: 40, symbol: "Zr", name: "Zirconium", atomic_weight: 91.224, default_valence: None, electronegativity: 1.33 },
    Element { atomic_number: 41, symbol: "Nb", name: "Niobium", atomic_weight: 92.906, default_valence: None, electronegativity: 1.60 },
    Element { atomic_number: 42, symbol: "Mo", name: "Molybdenum", atomic_weight: 95.95, default_valence: None, electronegativity: 2.16 },
    Element { atomic_number: 43, symbol: "Tc", name: "Technetium", atomic_weight: 98.0, default_valence: None, electronegativity: 1.90 },
    Element { atomic_number: 44, symbol: "Ru", name: "Ruthenium", atomic_weight: 101.07, default_valence: None, electronegativity: 2.20 },
    Element { atomic_number: 45, symbol: "Rh", name: "Rhodium", atomic_weight: 102.906, default_valence: None, electronegativity: 2.28 },
    Element { atomic_number: 46, symbol: "Pd", name: "Palladium", atomic_weight: 106.42, default_valence: None, electronegativity: 2.20 },
    Element { atomic_number: 47, symbol: "Ag", name: "Silver", atomic_weight: 107.868, default_valence: None, electronegativity: 1.93 },
    Element { atomic_number: 48, symbol: "Cd", name: "Cadmium", atomic_weight: 112.414, default_valence: None, electronegativity: 1.69 },
    Element { atomic_number: 49, symbol: "In", name: "Indium", atomic_weight: 114.818, default_valence: None, electronegativity: 1.78 },
    Element { atomic_number: 50, symbol: "Sn", name: "Tin", atomic_weight: 118.710, default_valence: Some(4), electronegativity: 1.96 },
    Element { atomic_number: 51, symbol: "Sb", name: "Antimony", atomic_weight: 121.760, default_valence: Some(3), electronegativity: 2.05 },
    Element { atomic_number: 52, symbol: "Te", name: "Tellurium", atomic_weight: 127.60, default_valence: Some(2), electronegativity: 2.10 },
    Element { atomic_number: 53, symbol: "I", name: "Iodine", atomic_weight: 126.904, default_valence: Some(1), electronegativity: 2.66 },
    Element { atomic_number: 54, symbol: "Xe", name: "Xenon", atomic_weight: 131.293, default_valence: None, electronegativity: 2.60 },
];

/// Look up an element by its symbol (e.g. "C", "Cl").
pub fn element_by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Look up an element by its atomic number.
pub fn element_by_number(n: u8) -> Option<&'static Element> {
    if (1..=54).contains(&n) {
        Some(&ELEMENTS[(n - 1) as usize])
    } else {
        None
    }
}
