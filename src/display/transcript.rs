//! Transcript formatting

use crate::services::Transcript;

const WIDTH: usize = 64;

/// Format a transcript grouped by semester
pub fn format_transcript(transcript: &Transcript) -> String {
    let student = &transcript.student;
    let mut output = String::new();

    output.push_str(&"=".repeat(WIDTH));
    output.push('\n');
    output.push_str(&format!("TRANSCRIPT: {}\n", student.name));
    output.push_str(&format!("ID: {}    Reg. No: {}\n", student.id, student.reg_no));
    output.push_str(&format!("Status: {}\n", student.status));
    output.push_str(&"=".repeat(WIDTH));
    output.push('\n');

    if transcript.semesters.is_empty() {
        output.push_str("\nNo graded courses yet.\n");
    }

    for record in &transcript.semesters {
        output.push('\n');
        output.push_str(&format!("{}\n", record.semester.display_name()));
        output.push_str(&format!(
            "  {:<8} {:<28} {:>7} {:>6}  {}\n",
            "Code", "Title", "Credits", "Marks", "Grade"
        ));
        output.push_str(&format!("  {}\n", "-".repeat(WIDTH - 2)));
        for line in &record.lines {
            output.push_str(&format!(
                "  {:<8} {:<28} {:>7} {:>6.1}  {}\n",
                line.course_code,
                truncate(&line.title, 28),
                line.credits,
                line.marks,
                line.grade.letter()
            ));
        }
        output.push_str(&format!(
            "  Semester credits: {}    Semester GPA: {:.2}\n",
            record.credits, record.gpa
        ));
    }

    output.push('\n');
    output.push_str(&"-".repeat(WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "Total credits: {}    Overall GPA: {:.2}\n",
        transcript.total_credits, transcript.overall_gpa
    ));

    output
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
