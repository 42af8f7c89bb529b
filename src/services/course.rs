//! Course service
//!
//! Provides business logic for the course catalogue.

use crate::audit::EntityType;
use crate::config::settings::Settings;
use crate::error::{RegistrarError, RegistrarResult};
use crate::models::{Course, CourseCode, Semester};
use crate::storage::Storage;

/// Service for course management
pub struct CourseService<'a> {
    storage: &'a Storage,
    max_credits: u32,
    credit_limit: u32,
}

/// Input for adding a course; `None` fields take the course defaults
#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    pub code: String,
    pub title: String,
    pub credits: Option<u32>,
    pub instructor: String,
    pub department: String,
    pub semester: Option<Semester>,
}

/// Optional changes applied by `update`
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub credits: Option<u32>,
    pub instructor: Option<String>,
    pub department: Option<String>,
    pub semester: Option<Semester>,
}

/// Search criteria; every set field must match
#[derive(Debug, Clone, Default)]
pub struct CourseSearch {
    /// Case-insensitive substring of the department
    pub department: Option<String>,
    /// Case-insensitive substring of the instructor
    pub instructor: Option<String>,
    pub semester: Option<Semester>,
    /// Inclusive lower credit bound
    pub min_credits: Option<u32>,
    /// Inclusive upper credit bound
    pub max_credits: Option<u32>,
    pub include_inactive: bool,
}

impl CourseSearch {
    fn matches(&self, course: &Course) -> bool {
        let contains = |haystack: &str, needle: &Option<String>| {
            needle
                .as_deref()
                .map_or(true, |n| haystack.to_lowercase().contains(&n.trim().to_lowercase()))
        };

        (self.include_inactive || course.active)
            && contains(&course.department, &self.department)
            && contains(&course.instructor, &self.instructor)
            && self.semester.map_or(true, |s| course.semester == s)
            && self.min_credits.map_or(true, |min| course.credits >= min)
            && self.max_credits.map_or(true, |max| course.credits <= max)
    }
}

impl<'a> CourseService<'a> {
    /// Course service with the default limits
    #[cfg(test)]
    pub(crate) fn new(storage: &'a Storage) -> Self {
        Self::from_settings(storage, &Settings::default())
    }

    /// Course service enforcing the configured course ceiling and semester cap
    pub fn from_settings(storage: &'a Storage, settings: &Settings) -> Self {
        Self::with_limits(
            storage,
            settings.max_course_credits,
            settings.max_credits_per_semester,
        )
    }

    /// `max_credits` bounds a single course; `credit_limit` is the
    /// per-semester cap enrolled students must stay within
    pub fn with_limits(storage: &'a Storage, max_credits: u32, credit_limit: u32) -> Self {
        Self {
            storage,
            max_credits,
            credit_limit,
        }
    }

    /// Add a course to the catalogue
    pub fn add(&self, input: NewCourse) -> RegistrarResult<Course> {
        let mut course = Course::new(input.code.as_str(), &input.title)
            .with_instructor(&input.instructor)
            .with_department(&input.department);
        if let Some(credits) = input.credits {
            course = course.with_credits(credits);
        }
        if let Some(semester) = input.semester {
            course = course.with_semester(semester);
        }

        course
            .validate(self.max_credits)
            .map_err(|e| RegistrarError::Validation(e.to_string()))?;

        if self.storage.courses.contains(&course.code)? {
            return Err(RegistrarError::Duplicate {
                entity_type: "Course",
                identifier: course.code.to_string(),
            });
        }

        self.storage.courses.upsert(course.clone())?;
        self.storage.courses.save()?;

        self.storage.log_create(
            EntityType::Course,
            course.code.to_string(),
            Some(course.title.clone()),
            &course,
        )?;
        tracing::info!(code = %course.code, credits = course.credits, "course added");

        Ok(course)
    }

    pub fn find(&self, code: &str) -> RegistrarResult<Option<Course>> {
        self.storage.courses.get(&CourseCode::new(code))
    }

    /// Like `find`, but a miss is an error
    pub fn require(&self, code: &str) -> RegistrarResult<Course> {
        self.find(code)?
            .ok_or_else(|| RegistrarError::course_not_found(code.trim()))
    }

    /// List courses ordered by code
    pub fn list(&self, include_inactive: bool) -> RegistrarResult<Vec<Course>> {
        self.search(&CourseSearch {
            include_inactive,
            ..CourseSearch::default()
        })
    }

    pub fn search(&self, criteria: &CourseSearch) -> RegistrarResult<Vec<Course>> {
        Ok(self
            .storage
            .courses
            .get_all()?
            .into_iter()
            .filter(|c| criteria.matches(c))
            .collect())
    }

    /// Apply changes to a course; the code never changes
    pub fn update(&self, code: &str, changes: CourseUpdate) -> RegistrarResult<Course> {
        let mut course = self.require(code)?;
        let before = course.clone();

        if let Some(title) = changes.title {
            course.title = title.trim().to_string();
        }
        if let Some(credits) = changes.credits {
            course.credits = credits;
        }
        if let Some(instructor) = changes.instructor {
            course.instructor = instructor.trim().to_string();
        }
        if let Some(department) = changes.department {
            course.department = department.trim().to_string();
        }
        if let Some(semester) = changes.semester {
            course.semester = semester;
        }
        course.touch();

        course
            .validate(self.max_credits)
            .map_err(|e| RegistrarError::Validation(e.to_string()))?;

        if course.credits != before.credits || course.semester != before.semester {
            self.check_enrolled_loads(&course)?;
        }

        self.storage.courses.upsert(course.clone())?;
        self.storage.courses.save()?;

        self.storage.log_update(
            EntityType::Course,
            course.code.to_string(),
            Some(course.title.clone()),
            &before,
            &course,
        )?;

        Ok(course)
    }

    /// Every student enrolled in `course` must stay within the semester cap
    /// once the course carries its new credits and semester
    fn check_enrolled_loads(&self, course: &Course) -> RegistrarResult<()> {
        for enrollment in self.storage.enrollments.get_by_course(&course.code)? {
            let mut current = 0;
            for other in self.storage.enrollments.get_by_student(&enrollment.student_id)? {
                if other.course_code == course.code {
                    continue;
                }
                if let Some(other_course) = self.storage.courses.get(&other.course_code)? {
                    if other_course.semester == course.semester {
                        current += other_course.credits;
                    }
                }
            }

            if current.saturating_add(course.credits) > self.credit_limit {
                tracing::warn!(
                    code = %course.code,
                    student = %enrollment.student_id,
                    "course change refused: semester cap"
                );
                return Err(RegistrarError::CreditLimitExceeded {
                    student: enrollment.student_id.to_string(),
                    course: course.code.to_string(),
                    semester: course.semester.to_string(),
                    current,
                    requested: course.credits,
                    limit: self.credit_limit,
                });
            }
        }
        Ok(())
    }

    /// Stop a course from accepting enrollments
    pub fn deactivate(&self, code: &str) -> RegistrarResult<Course> {
        let mut course = self.require(code)?;
        if !course.active {
            return Err(RegistrarError::Validation(format!(
                "Course '{}' is already inactive",
                course.code
            )));
        }

        let before = course.clone();
        course.deactivate();

        self.storage.courses.upsert(course.clone())?;
        self.storage.courses.save()?;

        self.storage.log_update(
            EntityType::Course,
            course.code.to_string(),
            Some(course.title.clone()),
            &before,
            &course,
        )?;
        tracing::info!(code = %course.code, "course deactivated");

        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::RegistrarPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn course(code: &str, credits: u32, dept: &str, instructor: &str, sem: Semester) -> NewCourse {
        NewCourse {
            code: code.into(),
            title: format!("{} title", code),
            credits: Some(credits),
            instructor: instructor.into(),
            department: dept.into(),
            semester: Some(sem),
        }
    }

    fn seed(service: &CourseService<'_>) {
        service
            .add(course("CS101", 4, "Computer Science", "Dr. Hopper", Semester::Fall))
            .unwrap();
        service
            .add(course("CS201", 3, "Computer Science", "Dr. Knuth", Semester::Spring))
            .unwrap();
        service
            .add(course("MA101", 2, "Mathematics", "Dr. Noether", Semester::Fall))
            .unwrap();
    }

    #[test]
    fn test_add_defaults() {
        let (_temp, storage) = create_test_storage();
        let service = CourseService::new(&storage);

        let added = service
            .add(NewCourse {
                code: "PH100".into(),
                title: "Physics".into(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(added.credits, 3);
        assert_eq!(added.semester, Semester::Spring);
        assert!(added.active);
    }

    #[test]
    fn test_add_rejects_bad_credits_and_duplicates() {
        let (_temp, storage) = create_test_storage();
        let service = CourseService::new(&storage);

        let heavy = service.add(course("CS999", 11, "CS", "X", Semester::Fall));
        assert!(heavy.unwrap_err().is_validation());

        seed(&service);
        let dup = service.add(course("CS101", 3, "CS", "X", Semester::Fall));
        assert!(dup.unwrap_err().is_duplicate());
    }

    #[test]
    fn test_configured_ceiling() {
        let (_temp, storage) = create_test_storage();
        let service = CourseService::with_limits(&storage, 12, 20);
        assert!(service
            .add(course("CS999", 12, "CS", "X", Semester::Fall))
            .is_ok());
    }

    #[test]
    fn test_search_criteria() {
        let (_temp, storage) = create_test_storage();
        let service = CourseService::new(&storage);
        seed(&service);

        let by_dept = service
            .search(&CourseSearch {
                department: Some("computer".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_dept.len(), 2);

        let by_instructor = service
            .search(&CourseSearch {
                instructor: Some("NOETHER".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_instructor[0].code.as_str(), "MA101");

        let fall_heavy = service
            .search(&CourseSearch {
                semester: Some(Semester::Fall),
                min_credits: Some(3),
                max_credits: Some(4),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(fall_heavy.len(), 1);
        assert_eq!(fall_heavy[0].code.as_str(), "CS101");
    }

    #[test]
    fn test_update_and_deactivate() {
        let (_temp, storage) = create_test_storage();
        let service = CourseService::new(&storage);
        seed(&service);

        let updated = service
            .update(
                "CS101",
                CourseUpdate {
                    credits: Some(5),
                    semester: Some(Semester::Summer),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.credits, 5);
        assert_eq!(updated.semester, Semester::Summer);

        let invalid = service.update(
            "CS101",
            CourseUpdate {
                title: Some(" ".into()),
                ..Default::default()
            },
        );
        assert!(invalid.unwrap_err().is_validation());

        service.deactivate("CS201").unwrap();
        assert_eq!(service.list(false).unwrap().len(), 2);
        assert_eq!(service.list(true).unwrap().len(), 3);
        assert!(service.deactivate("CS201").is_err());
        assert!(service.require("XX000").unwrap_err().is_not_found());
    }
}
