//! In-memory student registry

use super::error::{AttendanceError, Result};
use super::models::{ClassId, Section, Student, StudentIdentity};
use crate::info;
use std::collections::{BTreeMap, HashMap};

/// Students in insertion order, indexed by identity.
///
/// No two students share a `(class, section, roll)` triple.
#[derive(Debug, Default, Clone)]
pub struct StudentRegistry {
    students: Vec<Student>,
    index: HashMap<StudentIdentity, usize>,
}

impl StudentRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a student.
    ///
    /// # Errors
    /// Returns [`AttendanceError::DuplicateIdentity`] when the identity is taken;
    /// the registry is left unchanged
    pub fn add(&mut self, student: Student) -> Result<()> {
        let identity = student.identity().clone();
        if self.index.contains_key(&identity) {
            return Err(AttendanceError::DuplicateIdentity(identity.to_string()));
        }
        info!(
            "Added student {} ({}) to class {}-{}",
            student.name(),
            identity.roll,
            identity.class,
            identity.section
        );
        self.index.insert(identity, self.students.len());
        self.students.push(student);
        Ok(())
    }

    /// Look up a student by identity
    #[must_use]
    pub fn find_by_identity(&self, class: ClassId, section: Section, roll: &str) -> Option<&Student> {
        self.index
            .get(&StudentIdentity::new(class, section, roll))
            .map(|i| &self.students[*i])
    }

    /// Mutable lookup by identity
    pub fn get_mut(&mut self, class: ClassId, section: Section, roll: &str) -> Option<&mut Student> {
        let position = *self.index.get(&StudentIdentity::new(class, section, roll))?;
        self.students.get_mut(position)
    }

    /// Students of one class and section, in insertion order
    #[must_use]
    pub fn filter_by_class_section(&self, class: ClassId, section: Section) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|s| s.is_in(class, section))
            .collect()
    }

    /// Mutable view of one class and section
    pub fn class_section_mut(
        &mut self,
        class: ClassId,
        section: Section,
    ) -> impl Iterator<Item = &mut Student> + '_ {
        self.students
            .iter_mut()
            .filter(move |s| s.is_in(class, section))
    }

    /// Students of every section of `class`
    #[must_use]
    pub fn students_in_class(&self, class: ClassId) -> Vec<&Student> {
        self.students.iter().filter(|s| s.class() == class).collect()
    }

    /// First student whose roll equals `text` exactly or whose name contains it
    #[must_use]
    pub fn find_by_roll_or_name(&self, class: ClassId, section: Section, text: &str) -> Option<&Student> {
        self.students
            .iter()
            .filter(|s| s.is_in(class, section))
            .find(|s| s.roll() == text || s.name().contains(text))
    }

    /// Swap out everything held for one class and section.
    ///
    /// Used after loading a class file, so reloading never duplicates students.
    /// Incoming students outside the pair or repeating an identity are dropped.
    pub fn replace_class_section(&mut self, class: ClassId, section: Section, incoming: Vec<Student>) {
        self.students.retain(|s| !s.is_in(class, section));
        self.reindex();
        for student in incoming {
            if student.is_in(class, section) && !self.index.contains_key(student.identity()) {
                self.index.insert(student.identity().clone(), self.students.len());
                self.students.push(student);
            }
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .students
            .iter()
            .enumerate()
            .map(|(i, s)| (s.identity().clone(), i))
            .collect();
    }

    /// Class numbers mapped to the sections present in each
    #[must_use]
    pub fn roster(&self) -> BTreeMap<ClassId, Vec<Section>> {
        let mut roster: BTreeMap<ClassId, Vec<Section>> = BTreeMap::new();
        for student in &self.students {
            let sections = roster.entry(student.class()).or_default();
            if !sections.contains(&student.section()) {
                sections.push(student.section());
            }
        }
        for sections in roster.values_mut() {
            sections.sort_unstable();
        }
        roster
    }

    /// All students in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Student> + '_ {
        self.students.iter()
    }

    /// Number of registered students
    #[must_use]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// `true` when nobody is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

impl<'a> IntoIterator for &'a StudentRegistry {
    type Item = &'a Student;
    type IntoIter = std::slice::Iter<'a, Student>;

    fn into_iter(self) -> Self::IntoIter {
        self.students.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Registration;

    fn student(class: &str, section: &str, roll: &str, name: &str) -> Student {
        Registration {
            roll: roll.to_string(),
            name: name.to_string(),
            class: class.to_string(),
            section: section.to_string(),
            contact: "9876543210".to_string(),
            email: "kid@school.edu".to_string(),
            gender: "M".to_string(),
            dob: "2012-01-01".to_string(),
        }
        .validate()
        .unwrap()
    }

    fn ids(class: u8, section: char) -> (ClassId, Section) {
        (ClassId::new(class).unwrap(), Section::new(section).unwrap())
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = StudentRegistry::new();
        registry.add(student("7", "B", "1", "Asha")).unwrap();
        let err = registry.add(student("7", "B", "1", "Other")).unwrap_err();
        assert!(matches!(err, AttendanceError::DuplicateIdentity(_)));
        assert_eq!(registry.len(), 1);

        // Same roll in another section is a different student
        registry.add(student("7", "C", "1", "Ravi")).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_lookups() {
        let mut registry = StudentRegistry::new();
        registry.add(student("7", "B", "1", "Asha Rao")).unwrap();
        registry.add(student("7", "B", "2", "Ravi Kumar")).unwrap();
        registry.add(student("8", "B", "3", "Meena")).unwrap();
        let (class, section) = ids(7, 'B');

        assert_eq!(registry.filter_by_class_section(class, section).len(), 2);
        assert_eq!(registry.students_in_class(class).len(), 2);
        assert_eq!(
            registry.find_by_identity(class, section, "2").map(Student::name),
            Some("Ravi Kumar")
        );
        assert!(registry.find_by_identity(class, section, "3").is_none());
        assert_eq!(
            registry.find_by_roll_or_name(class, section, "Kum").map(Student::roll),
            Some("2")
        );
        assert_eq!(
            registry.find_by_roll_or_name(class, section, "1").map(Student::name),
            Some("Asha Rao")
        );
        assert!(registry.find_by_roll_or_name(class, section, "Meena").is_none());
    }

    #[test]
    fn test_replace_class_section() {
        let mut registry = StudentRegistry::new();
        registry.add(student("7", "B", "1", "Asha")).unwrap();
        registry.add(student("8", "A", "9", "Meena")).unwrap();
        let (class, section) = ids(7, 'B');

        let incoming = vec![student("7", "B", "1", "Asha"), student("7", "B", "2", "Ravi")];
        registry.replace_class_section(class, section, incoming.clone());
        registry.replace_class_section(class, section, incoming);

        assert_eq!(registry.len(), 3);
        assert!(registry.find_by_identity(class, section, "2").is_some());
        let (other_class, other_section) = ids(8, 'A');
        assert!(registry.find_by_identity(other_class, other_section, "9").is_some());
    }

    #[test]
    fn test_roster() {
        let mut registry = StudentRegistry::new();
        registry.add(student("7", "C", "1", "A")).unwrap();
        registry.add(student("7", "A", "1", "B")).unwrap();
        registry.add(student("2", "A", "1", "C")).unwrap();
        let roster = registry.roster();
        let classes: Vec<u8> = roster.keys().map(|c| c.number()).collect();
        assert_eq!(classes, vec![2, 7]);
        let sevens: Vec<char> = roster[&ClassId::new(7).unwrap()]
            .iter()
            .map(|s| s.letter())
            .collect();
        assert_eq!(sevens, vec!['A', 'C']);
    }
}
