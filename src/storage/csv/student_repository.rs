//! CSV-backed student repository, storing the registry in `students.csv`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{Reader, Writer};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::domain::models::Student;
use crate::storage::traits::StudentStore;

use super::connection::CsvConnection;

const FILE_NAME: &str = "students.csv";
const HEADER: &str = "id,name,created_at\n";

/// CSV record structure for students.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StudentRecord {
    id: u64,
    name: String,
    created_at: String,
}

impl From<&Student> for StudentRecord {
    fn from(student: &Student) -> Self {
        StudentRecord {
            id: student.id,
            name: student.name.clone(),
            created_at: student.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<StudentRecord> for Student {
    type Error = anyhow::Error;

    fn try_from(record: StudentRecord) -> Result<Self> {
        let created_at = DateTime::parse_from_rfc3339(&record.created_at)
            .with_context(|| format!("failed to parse created_at '{}'", record.created_at))?
            .with_timezone(&Utc);

        Ok(Student {
            id: record.id,
            name: record.name,
            created_at,
        })
    }
}

/// CSV-based student repository.
#[derive(Clone)]
pub struct StudentRepository {
    connection: CsvConnection,
    next_id: Arc<Mutex<Option<u64>>>,
}

impl StudentRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            connection,
            next_id: Arc::new(Mutex::new(None)),
        }
    }

    fn read_students(&self) -> Result<Vec<Student>> {
        self.connection.ensure_file_exists(FILE_NAME, HEADER)?;

        let file = File::open(self.connection.file_path(FILE_NAME))?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut students = Vec::new();
        for result in csv_reader.deserialize::<StudentRecord>() {
            let record = result?;
            match Student::try_from(record) {
                Ok(student) => students.push(student),
                Err(e) => {
                    warn!("skipping unparsable student record: {e}");
                    continue;
                }
            }
        }

        Ok(students)
    }

    fn write_students(&self, students: &[Student]) -> Result<()> {
        let file_path = self.connection.file_path(FILE_NAME);
        let temp_file_path = file_path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_file_path)?;
            let writer = BufWriter::new(temp_file);
            let mut csv_writer = Writer::from_writer(writer);

            for student in students {
                csv_writer.serialize(StudentRecord::from(student))?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_file_path, &file_path)?;
        Ok(())
    }
}

impl StudentStore for StudentRepository {
    fn list_students(&self) -> Result<Vec<Student>> {
        let mut students = self.read_students()?;
        students.sort_by_key(|s| s.id);
        Ok(students)
    }

    fn store_student(&self, student: &Student) -> Result<()> {
        let mut students = self.read_students()?;
        students.push(student.clone());
        students.sort_by_key(|s| s.id);
        self.write_students(&students)
    }

    fn delete_student(&self, id: u64) -> Result<bool> {
        let mut students = self.read_students()?;
        let before = students.len();
        students.retain(|s| s.id != id);

        if students.len() == before {
            return Ok(false);
        }

        self.write_students(&students)?;
        Ok(true)
    }

    fn next_student_id(&self) -> Result<u64> {
        let mut guard = self.next_id.lock().unwrap();
        let next = match *guard {
            Some(reserved) => reserved,
            None => {
                self.read_students()?
                    .iter()
                    .map(|s| s.id)
                    .max()
                    .unwrap_or(0)
                    + 1
            }
        };
        *guard = Some(next + 1);
        Ok(next)
    }
}
