use clap::Args;
use std::path::PathBuf;

use crate::infra::{attachment_from_path, named_attachment, portal_service, session_store};
use intern_portal::config::AppConfig;
use intern_portal::error::AppError;
use intern_portal::portal::service::{DEMO_EMAIL, DEMO_PASSWORD};
use intern_portal::portal::{
    navigate, post_login_destination, ApplicationField, ApplicationService, ApplicationWizard,
    GuardDecision, InternshipService, LoginCredentials, MemoryStorage, UploadKind, WizardStep,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Internship to apply for
    #[arg(long, default_value = "1")]
    pub(crate) internship: String,
    /// Local resume file to attach (its type is guessed from the extension)
    #[arg(long, conflicts_with = "resume_link")]
    pub(crate) resume: Option<PathBuf>,
    /// Shareable resume link instead of a file
    #[arg(long)]
    pub(crate) resume_link: Option<String>,
    /// Optional portfolio file
    #[arg(long)]
    pub(crate) portfolio: Option<PathBuf>,
}

const APPLICANT: [(ApplicationField, &str); 18] = [
    (ApplicationField::FirstName, "John"),
    (ApplicationField::LastName, "Doe"),
    (ApplicationField::Email, DEMO_EMAIL),
    (ApplicationField::Phone, "4155550123"),
    (ApplicationField::DateOfBirth, "2002-05-14"),
    (ApplicationField::Address, "500 Howard Street"),
    (ApplicationField::City, "San Francisco"),
    (ApplicationField::State, "CA"),
    (ApplicationField::ZipCode, "94105"),
    (ApplicationField::Degree, "Bachelor of Science"),
    (ApplicationField::FieldOfStudy, "Computer Science"),
    (ApplicationField::University, "State University"),
    (ApplicationField::GraduationYear, "2026"),
    (ApplicationField::Skills, "TypeScript, React, Rust and SQL"),
    (
        ApplicationField::CoverLetter,
        "I enjoy turning designs into fast, accessible interfaces.",
    ),
    (
        ApplicationField::WhyInterested,
        "Your team ships product used by thousands of people.",
    ),
    (ApplicationField::Availability, "Full-time, June to August"),
    (ApplicationField::Projects, "Campus events app with 2k monthly users"),
];

pub(crate) async fn run_demo(config: &AppConfig, args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        internship,
        resume,
        resume_link,
        portfolio,
    } = args;

    let service = portal_service(config);
    let store = session_store(service.clone(), MemoryStorage::default());

    println!("Internship portal demo");
    let page = format!("/internship/{internship}");
    let state = store.initialize();
    if let GuardDecision::Redirect { to, .. } = navigate(&state, &page) {
        println!("- {page} requires sign-in, redirected to {to}");
    }

    let credentials = LoginCredentials {
        email: DEMO_EMAIL.to_string(),
        password: DEMO_PASSWORD.to_string(),
    };
    let user = store.login(&credentials).await?;
    println!(
        "- Signed in as {}; continuing to {}",
        user.display_name(),
        post_login_destination(Some(&page))
    );

    let posting = service
        .internship_by_id(&internship)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("internship {internship}")))?;
    println!(
        "- Applying for {} at {} ({})",
        posting.title,
        posting.company,
        posting.location_type.label()
    );

    let mut wizard = ApplicationWizard::new(service.clone(), posting.id.clone());
    for (field, value) in APPLICANT {
        wizard.set_text(field, value)?;
    }
    wizard.set_has_experience(true)?;

    while wizard.step() < WizardStep::Resume {
        println!("  {}", wizard.progress());
        wizard.next()?;
    }

    println!("  {}", wizard.progress());
    match (resume, resume_link) {
        (Some(path), _) => {
            let file = attachment_from_path(&path)?;
            let url = service.upload_file(&file, UploadKind::Resume).await?;
            println!("    uploaded {} ({}) to {url}", file.name, file.content_type);
            wizard.set_resume_file(file)?;
        }
        (None, Some(link)) => wizard.set_resume_link(&link)?,
        (None, None) => wizard.set_resume_file(named_attachment("john-doe-resume.pdf", 84_512))?,
    }
    if let Some(path) = portfolio {
        let file = attachment_from_path(&path)?;
        let url = service.upload_file(&file, UploadKind::Portfolio).await?;
        println!("    uploaded portfolio {} to {url}", file.name);
        wizard.set_portfolio(Some(file))?;
    }
    if let Some(message) = wizard.resume_link_error() {
        println!("    {message}");
    }
    wizard.next()?;

    println!("  {}", wizard.progress());
    println!("\nReview");
    for line in wizard.review().to_string().lines() {
        println!("  {line}");
    }

    wizard.set_terms_accepted(true)?;
    let application_id = wizard.submit().await?;
    println!("\nApplication submitted successfully! Reference {application_id}");

    store.logout();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use intern_portal::portal::{MockPortalService, WizardStatus};
    use std::sync::Arc;

    #[tokio::test]
    async fn scripted_applicant_passes_every_step() {
        let mut wizard = ApplicationWizard::new(Arc::new(MockPortalService::instant()), "1");
        for (field, value) in APPLICANT {
            wizard.set_text(field, value).expect("edit");
        }
        assert!(wizard.errors().is_empty());

        while wizard.step() < WizardStep::Resume {
            wizard.next().expect("step complete");
        }
        wizard
            .set_resume_file(named_attachment("john-doe-resume.pdf", 1))
            .expect("resume");
        wizard.next().expect("resume");
        wizard.set_terms_accepted(true).expect("terms");

        let id = wizard.submit().await.expect("submitted");
        assert_eq!(wizard.status(), &WizardStatus::Completed(id));
    }

    #[test]
    fn named_resume_is_a_pdf() {
        assert_eq!(
            named_attachment("john-doe-resume.pdf", 1).content_type,
            "application/pdf"
        );
    }
}
