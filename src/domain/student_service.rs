//! Student registry.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::info;

use crate::domain::commands::students::CreateStudentCommand;
use crate::domain::models::Student;
use crate::error::LedgerError;
use crate::storage::traits::{Connection, StudentStore};

#[derive(Clone)]
pub struct StudentService<C: Connection> {
    student_repository: C::StudentRepository,
    write_lock: Arc<Mutex<()>>,
}

impl<C: Connection> StudentService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let student_repository = connection.create_student_repository();
        Self {
            student_repository,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// All registered students, ascending by id (registration order).
    pub fn list_students(&self) -> Result<Vec<Student>, LedgerError> {
        Ok(self.student_repository.list_students()?)
    }

    /// Register a student. Names are trimmed and must be unique among the
    /// currently registered students; the comparison is case-sensitive, so
    /// "Anna" and "anna" are two different students.
    pub fn create_student(&self, command: CreateStudentCommand) -> Result<Student, LedgerError> {
        let name = command.name.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::InvalidInput(
                "student name must not be empty".to_string(),
            ));
        }

        let _guard = self.write_lock.lock().unwrap();

        let students = self.student_repository.list_students()?;
        if students.iter().any(|s| s.name == name) {
            return Err(LedgerError::Conflict(name));
        }

        let student = Student {
            id: self.student_repository.next_student_id()?,
            name,
            created_at: command.created_at.unwrap_or_else(Utc::now),
        };
        self.student_repository.store_student(&student)?;

        info!("registered student {} ({})", student.id, student.name);
        Ok(student)
    }

    pub fn delete_student(&self, id: u64) -> Result<bool, LedgerError> {
        let _guard = self.write_lock.lock().unwrap();

        let deleted = self.student_repository.delete_student(id)?;
        if deleted {
            info!("removed student {id}");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryConnection;

    fn create_test_service() -> StudentService<MemoryConnection> {
        StudentService::new(Arc::new(MemoryConnection::new()))
    }

    #[test]
    fn create_trims_and_rejects_blank_names() {
        let service = create_test_service();

        let student = service
            .create_student(CreateStudentCommand::new("  Anna  "))
            .unwrap();
        assert_eq!(student.name, "Anna");

        let err = service
            .create_student(CreateStudentCommand::new("   "))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_names_conflict_case_sensitively() {
        let service = create_test_service();

        service.create_student(CreateStudentCommand::new("Anna")).unwrap();

        let err = service
            .create_student(CreateStudentCommand::new("Anna"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Conflict(name) if name == "Anna"));

        // Different case is a different student.
        assert!(service.create_student(CreateStudentCommand::new("anna")).is_ok());
    }

    #[test]
    fn a_deleted_name_can_be_registered_again() {
        let service = create_test_service();

        let anna = service.create_student(CreateStudentCommand::new("Anna")).unwrap();
        assert!(service.delete_student(anna.id).unwrap());

        let again = service.create_student(CreateStudentCommand::new("Anna")).unwrap();
        assert!(again.id > anna.id);
    }

    #[test]
    fn list_is_in_registration_order() {
        let service = create_test_service();

        service.create_student(CreateStudentCommand::new("Ben")).unwrap();
        service.create_student(CreateStudentCommand::new("Anna")).unwrap();

        let students = service.list_students().unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].name, "Ben");
        assert_eq!(students[1].name, "Anna");
        assert!(students[0].id < students[1].id);
    }
}
