//! Sample records the dashboard starts with. Reset on every restart.

use chrono::{DateTime, TimeZone, Utc};

use super::models::{
    ActivityLogEntry, ApplicationStatus, Candidate, CandidateApplication, CandidateCrsEntry,
    Requisition, RequisitionStatus,
};

fn on(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

pub fn sample_requisitions() -> Vec<Requisition> {
    vec![
        Requisition {
            id: "req1".into(),
            job_title: "Senior Frontend Engineer".into(),
            status: RequisitionStatus::Open,
            hiring_manager: text("Alice Wonderland"),
            location: text("Remote (US)"),
            date_created: on(2023, 11, 15),
            date_modified: None,
            candidate_count: 35,
            average_crs: Some(78),
            job_description: "Build amazing user interfaces with React and TypeScript. \
                Lead frontend projects and mentor junior developers."
                .into(),
            must_have_skills: text("React, TypeScript, JavaScript, HTML, CSS, Git"),
            nice_to_have_skills: text("Next.js, GraphQL, Tailwind CSS, UI/UX Design Principles"),
        },
        Requisition {
            id: "req2".into(),
            job_title: "Product Manager - Core Platform".into(),
            status: RequisitionStatus::Open,
            hiring_manager: text("Bob The Builder"),
            location: text("New York, NY"),
            date_created: on(2023, 10, 20),
            date_modified: None,
            candidate_count: 22,
            average_crs: Some(85),
            job_description: "Define and drive the product strategy for our core platform. \
                Work closely with engineering, design, and marketing teams."
                .into(),
            must_have_skills: text("Product Management, Agile, Roadmapping, User Stories, JIRA"),
            nice_to_have_skills: text("SaaS, B2B Products, Technical Background, Data Analysis"),
        },
        Requisition {
            id: "req3".into(),
            job_title: "UX Designer - Mobile".into(),
            status: RequisitionStatus::OnHold,
            hiring_manager: text("Charlie Brown"),
            location: text("San Francisco, CA"),
            date_created: on(2023, 12, 1),
            date_modified: None,
            candidate_count: 15,
            average_crs: Some(72),
            job_description: "Design intuitive and engaging mobile experiences for iOS and Android. \
                Conduct user research and create prototypes."
                .into(),
            must_have_skills: text(
                "UX Design, Figma, Prototyping, User Research, Mobile Design Patterns",
            ),
            nice_to_have_skills: text(
                "UI Design, Interaction Design, Adobe Creative Suite, Usability Testing",
            ),
        },
        Requisition {
            id: "req4".into(),
            job_title: "Marketing Specialist".into(),
            status: RequisitionStatus::Closed,
            hiring_manager: text("Diana Prince"),
            location: text("Chicago, IL"),
            date_created: on(2023, 9, 5),
            date_modified: None,
            candidate_count: 50,
            average_crs: Some(68),
            job_description: "Develop and execute marketing campaigns across various channels. \
                Analyze campaign performance and optimize for results."
                .into(),
            must_have_skills: text("Digital Marketing, SEO, SEM, Content Creation, Email Marketing"),
            nice_to_have_skills: text(
                "Google Analytics, HubSpot, Social Media Advertising, Graphic Design",
            ),
        },
    ]
}

pub fn sample_candidates() -> Vec<Candidate> {
    vec![
        Candidate {
            id: "cand1".into(),
            first_name: "Alice".into(),
            last_name: "Smith".into(),
            email: "alice.smith@example.com".into(),
            phone: text("555-0101"),
            location: text("New York, NY"),
            resume_text: text("Experienced software engineer with skills in React, Node.js..."),
            tags: vec!["frontend".into(), "react".into(), "senior".into()],
            source: text("LinkedIn"),
            date_added: on(2023, 11, 1),
            last_activity_date: Some(on(2023, 12, 5)),
            crs_history: vec![CandidateCrsEntry {
                requisition_id: "req1".into(),
                requisition_title: "Senior Frontend Engineer".into(),
                score: 85,
                date: on(2023, 12, 2),
            }],
            applications: vec![CandidateApplication {
                requisition_id: "req1".into(),
                requisition_title: "Senior Frontend Engineer".into(),
                status: ApplicationStatus::Interviewing,
                date_applied: on(2023, 12, 1),
                last_status_update: None,
            }],
            activity_log: vec![
                ActivityLogEntry {
                    date: on(2023, 12, 5),
                    activity: "Moved to Interviewing for Senior Frontend Engineer".into(),
                    user: text("Jane Recruiter"),
                    details: None,
                },
                ActivityLogEntry {
                    date: on(2023, 12, 2),
                    activity: "CRS Score 85 generated for Senior Frontend Engineer".into(),
                    user: None,
                    details: None,
                },
            ],
            notes: text("Strong candidate, great communication skills in initial screen."),
        },
        Candidate {
            id: "cand2".into(),
            first_name: "Bob".into(),
            last_name: "Johnson".into(),
            email: "bob.johnson@example.com".into(),
            phone: None,
            location: text("San Francisco, CA"),
            resume_text: text("Product manager with a background in SaaS..."),
            tags: vec!["product".into(), "saas".into(), "agile".into()],
            source: text("Referral"),
            date_added: on(2023, 10, 15),
            last_activity_date: Some(on(2023, 11, 20)),
            crs_history: Vec::new(),
            applications: Vec::new(),
            activity_log: Vec::new(),
            notes: None,
        },
    ]
}
