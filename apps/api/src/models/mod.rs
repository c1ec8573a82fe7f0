pub mod job_description;
pub mod resume;
pub mod tailored_resume;
