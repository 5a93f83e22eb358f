//! Static reference data: the role catalog and the seed internship postings.

use super::domain::{Internship, InternshipRole, LocationType};

struct RoleSeed {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    color: &'static str,
    count: u32,
}

const ROLE_SEEDS: [RoleSeed; 6] = [
    RoleSeed {
        id: "software-development",
        title: "Software Development",
        description: "Build web, mobile, and backend applications alongside experienced engineers.",
        icon: "Code",
        color: "bg-blue-500",
        count: 45,
    },
    RoleSeed {
        id: "data-science",
        title: "Data Science",
        description: "Analyze datasets, train models, and turn insights into product decisions.",
        icon: "BarChart",
        color: "bg-green-500",
        count: 32,
    },
    RoleSeed {
        id: "ui-ux-design",
        title: "UI/UX Design",
        description: "Design intuitive interfaces and research how people use digital products.",
        icon: "Palette",
        color: "bg-purple-500",
        count: 28,
    },
    RoleSeed {
        id: "digital-marketing",
        title: "Digital Marketing",
        description: "Plan campaigns, grow audiences, and measure performance across channels.",
        icon: "Megaphone",
        color: "bg-pink-500",
        count: 38,
    },
    RoleSeed {
        id: "business-analytics",
        title: "Business Analytics",
        description: "Model business processes and support strategy with reporting and forecasting.",
        icon: "TrendingUp",
        color: "bg-yellow-500",
        count: 24,
    },
    RoleSeed {
        id: "content-writing",
        title: "Content Writing",
        description: "Write blog posts, documentation, and marketing copy for a growing brand.",
        icon: "PenTool",
        color: "bg-indigo-500",
        count: 19,
    },
];

pub fn roles() -> Vec<InternshipRole> {
    ROLE_SEEDS
        .iter()
        .map(|seed| InternshipRole {
            id: seed.id.to_string(),
            title: seed.title.to_string(),
            description: seed.description.to_string(),
            icon: seed.icon.to_string(),
            color: seed.color.to_string(),
            count: seed.count,
        })
        .collect()
}

pub fn role(id: &str) -> Option<InternshipRole> {
    roles().into_iter().find(|role| role.id == id)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Seed postings. The first entry doubles as the template for derived listings.
pub fn internships() -> Vec<Internship> {
    vec![
        Internship {
            id: "1".to_string(),
            title: "Frontend Developer Intern".to_string(),
            company: "TechCorp Solutions".to_string(),
            location: "San Francisco, CA".to_string(),
            location_type: LocationType::Hybrid,
            duration: "3 months".to_string(),
            stipend: "$2000/month".to_string(),
            description: "Join our frontend team to build responsive interfaces used by thousands of customers.".to_string(),
            requirements: strings(&[
                "Currently pursuing a degree in Computer Science or a related field",
                "Familiarity with HTML, CSS, and JavaScript",
                "Basic understanding of a component framework",
            ]),
            responsibilities: strings(&[
                "Implement UI components from design specifications",
                "Write unit tests for new features",
                "Participate in code reviews",
            ]),
            skills: strings(&["React", "TypeScript", "CSS"]),
            role_id: "software-development".to_string(),
            posted: "2024-01-15".to_string(),
            deadline: "2024-02-15".to_string(),
            application_count: 45,
        },
        Internship {
            id: "2".to_string(),
            title: "Backend Engineering Intern".to_string(),
            company: "CloudScale Systems".to_string(),
            location: "Remote".to_string(),
            location_type: LocationType::Remote,
            duration: "6 months".to_string(),
            stipend: "$2200/month".to_string(),
            description: "Help design and operate the APIs that power our hosting platform.".to_string(),
            requirements: strings(&[
                "Experience with at least one backend language",
                "Understanding of HTTP and REST",
            ]),
            responsibilities: strings(&[
                "Build and document API endpoints",
                "Improve service observability",
            ]),
            skills: strings(&["Rust", "PostgreSQL", "Docker"]),
            role_id: "software-development".to_string(),
            posted: "2024-01-18".to_string(),
            deadline: "2024-02-20".to_string(),
            application_count: 31,
        },
        Internship {
            id: "3".to_string(),
            title: "Data Analyst Intern".to_string(),
            company: "Insight Analytics".to_string(),
            location: "New York, NY".to_string(),
            location_type: LocationType::OnSite,
            duration: "4 months".to_string(),
            stipend: "$1800/month".to_string(),
            description: "Work with the analytics team to clean data and build dashboards.".to_string(),
            requirements: strings(&[
                "Coursework in statistics",
                "Comfort with spreadsheets and SQL",
            ]),
            responsibilities: strings(&[
                "Prepare weekly reports",
                "Maintain data quality checks",
            ]),
            skills: strings(&["Python", "SQL", "Tableau"]),
            role_id: "data-science".to_string(),
            posted: "2024-01-10".to_string(),
            deadline: "2024-02-10".to_string(),
            application_count: 62,
        },
        Internship {
            id: "4".to_string(),
            title: "Product Design Intern".to_string(),
            company: "Pixel Studio".to_string(),
            location: "Austin, TX".to_string(),
            location_type: LocationType::Hybrid,
            duration: "3 months".to_string(),
            stipend: "$1600/month".to_string(),
            description: "Prototype new product flows and run usability sessions.".to_string(),
            requirements: strings(&["A portfolio of design work", "Experience with Figma"]),
            responsibilities: strings(&[
                "Create wireframes and prototypes",
                "Synthesize user research findings",
            ]),
            skills: strings(&["Figma", "User Research", "Prototyping"]),
            role_id: "ui-ux-design".to_string(),
            posted: "2024-01-20".to_string(),
            deadline: "2024-02-25".to_string(),
            application_count: 28,
        },
        Internship {
            id: "5".to_string(),
            title: "Growth Marketing Intern".to_string(),
            company: "BrightReach Media".to_string(),
            location: "Remote".to_string(),
            location_type: LocationType::Remote,
            duration: "3 months".to_string(),
            stipend: "$1400/month".to_string(),
            description: "Run experiments across social and email channels to grow signups.".to_string(),
            requirements: strings(&["Strong written communication", "Interest in analytics"]),
            responsibilities: strings(&[
                "Schedule and publish campaign content",
                "Track campaign metrics",
            ]),
            skills: strings(&["SEO", "Google Analytics", "Copywriting"]),
            role_id: "digital-marketing".to_string(),
            posted: "2024-01-12".to_string(),
            deadline: "2024-02-12".to_string(),
            application_count: 54,
        },
    ]
}
