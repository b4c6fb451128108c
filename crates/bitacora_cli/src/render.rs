//! Plain-text rendering for CLI output.

use bitacora_core::{
    auto_summary, format_session_text, ClientTimeline, ClientToken, ImportPreview, NextSession,
    Project, RoadmapStep, SessionRecord, TokenKind,
};
use chrono::DateTime;

const PREVIEW_SUMMARY_CHARS: usize = 200;

pub fn print_preview(preview: &ImportPreview) {
    if preview.is_empty() {
        println!("No notes detected.");
        return;
    }

    println!("{} note(s) detected:", preview.len());
    for (index, record) in preview.records().iter().enumerate() {
        println!();
        println!("{}. {}", index + 1, record.title);
        println!(
            "   {} | {} | {}",
            record.date.format("%d/%m/%Y"),
            record.tag,
            record.client_status.label()
        );
        if !record.client_responsible.is_empty() {
            println!("   Responsable: {}", record.client_responsible);
        }
        let clipped = record
            .summary
            .chars()
            .take(PREVIEW_SUMMARY_CHARS)
            .collect::<String>();
        let ellipsis = if record.summary.chars().count() > PREVIEW_SUMMARY_CHARS {
            "..."
        } else {
            ""
        };
        println!("   {clipped}{ellipsis}");
    }
}

pub fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects yet.");
        return;
    }
    for project in projects {
        println!(
            "{}  client={}  phase={} ({})",
            project.name,
            if project.client_name.is_empty() {
                "-"
            } else {
                project.client_name.as_str()
            },
            project.current_phase.id(),
            project.current_phase.label()
        );
    }
}

pub fn print_sessions(sessions: &[SessionRecord]) {
    if sessions.is_empty() {
        println!("No sessions recorded.");
        return;
    }
    for session in sessions {
        println!(
            "{}  [{}]  {}  ({})",
            session.date,
            session.tag,
            session.title,
            session.client_status.label()
        );
        let summary = auto_summary(&session.summary);
        if !summary.is_empty() {
            println!("    {summary}");
        }
    }
}

pub fn print_roadmap(project_name: &str, steps: &[RoadmapStep]) {
    println!("{project_name}");
    for step in steps {
        println!(
            "  {:02} {:<24} {}",
            step.phase.id(),
            step.phase.label(),
            step.status.label()
        );
    }
}

pub fn print_next_session(agenda: Option<&NextSession>) {
    let Some(agenda) = agenda.filter(|agenda| !agenda.is_empty()) else {
        println!("No next session planned.");
        return;
    };
    match agenda.date {
        Some(date) => println!("Next session: {}", date.format("%d/%m/%Y")),
        None => println!("Next session: date to be defined"),
    }
    for (index, topic) in agenda.topics.iter().enumerate() {
        println!("  {}. {topic}", index + 1);
    }
}

pub fn print_token(token: &ClientToken) {
    let expires = DateTime::from_timestamp_millis(token.expires_at)
        .map(|value| value.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| token.expires_at.to_string());
    println!("Share token: {}", token.token);
    println!("Expires: {expires}");
}

pub fn print_timeline(timeline: &ClientTimeline) {
    println!("{} ({})", timeline.project_name, timeline.client_name);
    print_roadmap("Roadmap", &timeline.roadmap);
    println!();
    print_next_session(timeline.next_session.as_ref());

    for session in &timeline.sessions {
        println!();
        println!("{}  {}  [{}]", session.date.format("%d/%m/%Y"), session.title, session.tag);
        if let Some(responsible) = &session.client_responsible {
            println!("Responsable: {responsible} ({})", session.client_status.label());
        }
        let formatted = format_session_text(&session.summary);
        for token in &formatted.preview {
            match token.kind {
                TokenKind::Heading => println!("## {}", token.text),
                TokenKind::ListItem => println!("  - {}", token.text),
                TokenKind::Paragraph => println!("{}", token.text),
            }
        }
        if formatted.is_long {
            println!("...");
        }
    }
}
