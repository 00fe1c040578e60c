//! NEET UG syllabus chapter lists (NTA 2025 outline).

use chrono::{DateTime, Utc};

use crate::model::{ChapterError, NewChapter, Subject, UserId};

const PHYSICS: &[&str] = &[
    "Basic Maths",
    "Vectors",
    "Units and Measurement",
    "Motion in Straight Lines",
    "Motion in Planes",
    "Laws of Motion",
    "Work, Energy and Power",
    "Centre of Mass and System of Particles",
    "Rotational Motion",
    "Gravitation",
    "Properties of Solids",
    "Properties of Liquids",
    "Thermodynamics",
    "Kinetic Theory of Gases",
    "Oscillations",
    "Waves",
    "Electric Charges and Fields",
    "Electrostatic Potential and Capacitance",
    "Current Electricity",
    "Moving Charges and Magnetism",
    "Magnetism and Matter",
    "Electromagnetic Induction",
    "Alternating Currents",
    "Electromagnetic Waves",
    "Wave Optics",
    "Ray Optics",
    "Dual Nature of Matter and Radiation",
    "Atoms",
    "Nuclei",
    "Semiconductors",
];

const CHEMISTRY: &[&str] = &[
    "Some Basic Concepts of Chemistry",
    "Redox Reactions",
    "Thermodynamics",
    "Chemical Equilibrium",
    "Ionic Equilibrium",
    "Solutions",
    "Electrochemistry",
    "Chemical Kinetics",
    "Atomic Structure",
    "Practical Physical Chemistry",
    "Classification of Elements and Periodicity in Properties",
    "Chemical Bonding and Molecular Structure",
    "Coordination Compounds",
    "P-Block Elements",
    "D and F Block Elements",
    "Salt Analysis",
    "IUPAC Nomenclature",
    "Isomerism",
    "General Organic Chemistry",
    "Hydrocarbons",
    "Haloalkanes and Haloarenes",
    "Alcohols, Phenols and Ethers",
    "Aldehydes, Ketones and Carboxylic Acids",
    "Amines",
    "Biomolecules",
    "Purification and Analysis of Organic Compounds",
];

const BIOLOGY: &[&str] = &[
    // Botany
    "Cell Structure and Function",
    "Cell Cycle",
    "The Living World",
    "Biological Classification",
    "Plant Kingdom",
    "Morphology of Flowering Plants",
    "Anatomy of Flowering Plants",
    "Respiration in Plants",
    "Photosynthesis in Higher Plants",
    "Plant Growth and Development",
    "Sexual Reproduction in Flowering Plants",
    "Molecular Basis of Inheritance",
    "Principles of Inheritance and Variation",
    "Microbes in Human Welfare",
    "Organisms and Populations",
    "Ecosystem",
    "Biodiversity and Conservation",
    // Zoology
    "Structural Organisation in Animals",
    "Breathing and Exchange of Gases",
    "Body Fluids and Circulation",
    "Excretory Products and their Elimination",
    "Locomotion and Movement",
    "Neural Control and Coordination",
    "Chemical Coordination and Integration",
    "Animal Kingdom",
    "Biomolecules",
    "Human Reproduction",
    "Reproductive Health",
    "Biotechnology: Principles and Processes",
    "Biotechnology and its Applications",
    "Evolution",
];

/// Ordered chapter names for one subject.
#[must_use]
pub fn chapters(subject: Subject) -> &'static [&'static str] {
    match subject {
        Subject::Physics => PHYSICS,
        Subject::Chemistry => CHEMISTRY,
        Subject::Biology => BIOLOGY,
    }
}

#[must_use]
pub fn total_chapters() -> usize {
    Subject::ALL.iter().map(|s| chapters(*s).len()).sum()
}

/// Builds the full chapter set for a newly registered user.
///
/// `order` restarts at 1 for each subject.
///
/// # Errors
///
/// Returns `ChapterError` only if the static data is malformed.
pub fn seed_chapters(user_id: UserId, now: DateTime<Utc>) -> Result<Vec<NewChapter>, ChapterError> {
    let mut out = Vec::with_capacity(total_chapters());
    for subject in Subject::ALL {
        for (idx, name) in chapters(subject).iter().enumerate() {
            let order = u32::try_from(idx + 1).map_err(|_| ChapterError::InvalidOrder)?;
            out.push(NewChapter::new(user_id, subject, *name, order, now)?);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_within_a_subject() {
        for subject in Subject::ALL {
            let list = chapters(subject);
            let unique: HashSet<_> = list.iter().collect();
            assert_eq!(unique.len(), list.len(), "{subject} has duplicates");
        }
    }

    #[test]
    fn seed_numbers_each_subject_from_one() {
        let seeded = seed_chapters(UserId::new(9), fixed_now()).unwrap();
        assert_eq!(seeded.len(), total_chapters());
        let first_chem = seeded
            .iter()
            .find(|c| c.subject == Subject::Chemistry)
            .unwrap();
        assert_eq!(first_chem.order, 1);
        assert_eq!(first_chem.name, "Some Basic Concepts of Chemistry");
        let last_bio = seeded.last().unwrap();
        assert_eq!(last_bio.subject, Subject::Biology);
        assert_eq!(last_bio.order as usize, BIOLOGY.len());
    }
}
