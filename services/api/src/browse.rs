use clap::Args;

use crate::infra::{parse_location_type, portal_service};
use intern_portal::config::AppConfig;
use intern_portal::error::AppError;
use intern_portal::portal::{
    filter_internships, search_roles, Internship, InternshipService, ListingFilters, LocationType,
};

#[derive(Args, Debug, Default)]
pub(crate) struct RolesArgs {
    /// Case-insensitive match on role title or description
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct InternshipsArgs {
    /// Role id, e.g. software-development. Without it every posting is searched.
    #[arg(long)]
    pub(crate) role: Option<String>,
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Substring of the posting location
    #[arg(long)]
    pub(crate) location: Option<String>,
    #[arg(long, value_parser = parse_location_type)]
    pub(crate) location_type: Option<LocationType>,
}

pub(crate) fn roles(args: RolesArgs) -> Result<(), AppError> {
    let roles = search_roles(args.search.as_deref().unwrap_or_default());
    if roles.is_empty() {
        println!("No roles match");
    }
    for role in roles {
        println!("{:<22} {:<22} {:>3} openings", role.id, role.title, role.count);
        println!("    {}", role.description);
    }
    Ok(())
}

pub(crate) async fn internships(config: &AppConfig, args: InternshipsArgs) -> Result<(), AppError> {
    let service = portal_service(config);

    let listings = match args.role {
        Some(role) => {
            let filters = ListingFilters {
                search: args.search,
                location: args.location,
                location_type: args.location_type,
            };
            let all = service.internships_by_role(&role).await?;
            filter_internships(&all, &filters)
        }
        None => {
            let filters = ListingFilters {
                search: None,
                location: args.location,
                location_type: args.location_type,
            };
            let all = service
                .search_internships(args.search.as_deref().unwrap_or_default(), &filters)
                .await?;
            filter_internships(&all, &filters)
        }
    };

    if listings.is_empty() {
        println!("No internships match");
    }
    for internship in &listings {
        print_listing(internship);
    }
    Ok(())
}

fn print_listing(internship: &Internship) {
    println!(
        "[{}] {} at {} ({}, {})",
        internship.id,
        internship.title,
        internship.company,
        internship.location,
        internship.location_type.label()
    );
    println!(
        "    {} | {} | apply by {} | {} applicants",
        internship.duration, internship.stipend, internship.deadline, internship.application_count
    );
}
