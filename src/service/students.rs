// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Student record operations.

use chrono::Utc;

use super::{ServiceError, ServiceResult};
use crate::{
    models::{Student, StudentRequest, StudentStats},
    storage::{RecordsDatabase, StorageError, StudentRepository},
    validation::validate_student,
};

const STUDENT_NOT_FOUND: &str = "Student not found";
const STUDENT_EXISTS: &str = "Student with this email or roll number already exists";

pub struct StudentService<'a> {
    db: &'a RecordsDatabase,
}

impl<'a> StudentService<'a> {
    pub fn new(db: &'a RecordsDatabase) -> Self {
        Self { db }
    }

    fn repo(&self) -> StudentRepository<'a> {
        StudentRepository::new(self.db)
    }

    /// Every student, newest first.
    pub fn list(&self) -> ServiceResult<Vec<Student>> {
        Ok(self.repo().list()?)
    }

    pub fn get(&self, student_id: &str) -> ServiceResult<Student> {
        self.repo().get(student_id).map_err(not_found_or_storage)
    }

    pub fn create(&self, request: &StudentRequest) -> ServiceResult<Student> {
        let fields = validate_student(request).map_err(ServiceError::Validation)?;

        let repo = self.repo();
        if repo
            .find_conflict(&fields.email, &fields.roll_number, None)?
            .is_some()
        {
            return Err(ServiceError::Conflict(STUDENT_EXISTS.into()));
        }

        let student = Student::new(fields, Utc::now());
        repo.create(&student).map_err(conflict_or_storage)?;

        tracing::info!(
            student_id = %student.id,
            roll_number = %student.roll_number,
            "Student created"
        );
        Ok(student)
    }

    /// Replace a student's fields. Validation runs before the existence
    /// check, and the record's own email/roll number never count as taken.
    pub fn update(&self, student_id: &str, request: &StudentRequest) -> ServiceResult<Student> {
        let fields = validate_student(request).map_err(ServiceError::Validation)?;

        let repo = self.repo();
        let current = repo.get(student_id).map_err(not_found_or_storage)?;

        if repo
            .find_conflict(&fields.email, &fields.roll_number, Some(student_id))?
            .is_some()
        {
            return Err(ServiceError::Conflict(STUDENT_EXISTS.into()));
        }

        let updated = current.updated(fields, Utc::now());
        repo.update(&updated).map_err(|e| match e {
            StorageError::NotFound(_) => ServiceError::NotFound(STUDENT_NOT_FOUND.into()),
            other => conflict_or_storage(other),
        })?;

        tracing::info!(student_id = %updated.id, grade = %updated.grade, "Student updated");
        Ok(updated)
    }

    pub fn delete(&self, student_id: &str) -> ServiceResult<Student> {
        let removed = self
            .repo()
            .delete(student_id)
            .map_err(not_found_or_storage)?;
        tracing::info!(student_id = %removed.id, "Student deleted");
        Ok(removed)
    }

    pub fn stats(&self) -> ServiceResult<StudentStats> {
        Ok(StudentStats::from_students(&self.repo().list()?))
    }
}

fn not_found_or_storage(error: StorageError) -> ServiceError {
    match error {
        StorageError::NotFound(_) => ServiceError::NotFound(STUDENT_NOT_FOUND.into()),
        other => other.into(),
    }
}

fn conflict_or_storage(error: StorageError) -> ServiceError {
    match error {
        StorageError::Conflict { .. } => ServiceError::Conflict(STUDENT_EXISTS.into()),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Grade;
    use tempfile::TempDir;

    fn setup() -> (RecordsDatabase, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = RecordsDatabase::open(&temp_dir.path().join("test.redb")).unwrap();
        (db, temp_dir)
    }

    fn request(email: &str, roll: &str, marks: Option<f64>) -> StudentRequest {
        StudentRequest {
            name: Some("Ada".into()),
            email: Some(email.into()),
            roll_number: Some(roll.into()),
            course: Some("CS".into()),
            semester: Some(3),
            attendance: Some(90.0),
            marks,
        }
    }

    #[test]
    fn create_derives_grade_from_marks() {
        let (db, _temp_dir) = setup();
        let service = StudentService::new(&db);

        let a = service.create(&request("a@x.com", "R1", Some(85.0))).unwrap();
        assert_eq!(a.grade, Grade::A);

        let f = service.create(&request("f@x.com", "R2", Some(45.0))).unwrap();
        assert_eq!(f.grade, Grade::F);

        let none = service.create(&request("n@x.com", "R3", None)).unwrap();
        assert_eq!(none.marks, 0.0);
        assert_eq!(none.grade, Grade::NotAvailable);
    }

    #[test]
    fn created_student_can_be_fetched() {
        let (db, _temp_dir) = setup();
        let service = StudentService::new(&db);

        let created = service.create(&request("a@x.com", "R1", Some(72.0))).unwrap();
        let fetched = service.get(&created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.grade, Grade::B);
    }

    #[test]
    fn duplicate_email_or_roll_number_is_a_conflict() {
        let (db, _temp_dir) = setup();
        let service = StudentService::new(&db);
        service.create(&request("a@x.com", "R1", Some(70.0))).unwrap();

        let same_email = service.create(&request("A@X.com", "R2", Some(70.0)));
        assert!(matches!(same_email, Err(ServiceError::Conflict(ref m)) if m == STUDENT_EXISTS));

        let same_roll = service.create(&request("b@x.com", "R1", Some(70.0)));
        assert!(matches!(same_roll, Err(ServiceError::Conflict(_))));

        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn invalid_input_is_rejected_before_lookup() {
        let (db, _temp_dir) = setup();
        let service = StudentService::new(&db);

        let mut bad = request("a@x.com", "R1", Some(120.0));
        bad.semester = Some(9);
        let Err(ServiceError::Validation(errors)) = service.update("missing", &bad) else {
            panic!("expected validation errors");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["semester", "marks"]);
    }

    #[test]
    fn update_recomputes_grade_and_keeps_identity() {
        let (db, _temp_dir) = setup();
        let service = StudentService::new(&db);
        let created = service.create(&request("a@x.com", "R1", Some(55.0))).unwrap();

        let mut changes = request("a@x.com", "R1", Some(95.0));
        changes.attendance = None;
        let updated = service.update(&created.id, &changes).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.grade, Grade::APlus);
        assert_eq!(updated.attendance, created.attendance);
        assert_eq!(service.get(&created.id).unwrap(), updated);
    }

    #[test]
    fn update_conflicts_only_with_other_students() {
        let (db, _temp_dir) = setup();
        let service = StudentService::new(&db);
        let first = service.create(&request("a@x.com", "R1", Some(70.0))).unwrap();
        service.create(&request("b@x.com", "R2", Some(70.0))).unwrap();

        let taken = service.update(&first.id, &request("b@x.com", "R1", Some(70.0)));
        assert!(matches!(taken, Err(ServiceError::Conflict(_))));

        let renamed = service
            .update(&first.id, &request("c@x.com", "R3", Some(70.0)))
            .unwrap();
        assert_eq!(renamed.roll_number, "R3");

        // The old roll number is free again
        service.create(&request("d@x.com", "R1", Some(70.0))).unwrap();
    }

    #[test]
    fn missing_student_is_not_found() {
        let (db, _temp_dir) = setup();
        let service = StudentService::new(&db);

        assert!(matches!(
            service.get("missing"),
            Err(ServiceError::NotFound(ref m)) if m == STUDENT_NOT_FOUND
        ));
        assert!(matches!(
            service.update("missing", &request("a@x.com", "R1", Some(70.0))),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete("missing"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn deleted_student_is_gone() {
        let (db, _temp_dir) = setup();
        let service = StudentService::new(&db);
        let created = service.create(&request("a@x.com", "R1", Some(70.0))).unwrap();

        let removed = service.delete(&created.id).unwrap();
        assert_eq!(removed.id, created.id);
        assert!(matches!(
            service.get(&created.id),
            Err(ServiceError::NotFound(_))
        ));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn stats_average_all_students() {
        let (db, _temp_dir) = setup();
        let service = StudentService::new(&db);
        assert_eq!(service.stats().unwrap().total, 0);

        service.create(&request("a@x.com", "R1", Some(80.0))).unwrap();
        let mut second = request("b@x.com", "R2", Some(65.0));
        second.attendance = Some(75.0);
        service.create(&second).unwrap();

        let stats = service.stats().unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.average_attendance, 82.5);
        assert_eq!(stats.average_marks, 72.5);
    }
}
