//! Fixed vocabularies used by the profile normalizer.

/// Canonical skill names recognised in CV and job text.
pub const SKILL_VOCABULARY: &[&str] = &[
    // Languages
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "C#",
    "C++",
    "Go",
    "Rust",
    "PHP",
    "Ruby",
    "Kotlin",
    "Swift",
    "SQL",
    "HTML",
    "CSS",
    // Frameworks and platforms
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Django",
    "Flask",
    "Spring",
    "ASP.NET",
    ".NET",
    "Laravel",
    // Data stores
    "PostgreSQL",
    "MySQL",
    "SQL Server",
    "MongoDB",
    "Oracle",
    // Infrastructure
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "Git",
    "Linux",
    "CI/CD",
    // Data and analytics
    "Excel",
    "Power BI",
    "Tableau",
    "Data Analysis",
    "Machine Learning",
    "Statistics",
    // Business systems
    "SAP",
    "Salesforce",
    "Pastel",
    "Sage",
    "Microsoft Office",
    "AutoCAD",
    // Finance
    "Accounting",
    "Bookkeeping",
    "Payroll",
    "Auditing",
    "IFRS",
    "Tax",
    // Delivery
    "Project Management",
    "Agile",
    "Scrum",
    // Commercial
    "Sales",
    "Marketing",
    "SEO",
    "Customer Service",
    // Soft skills
    "Communication",
    "Leadership",
    "Teamwork",
    "Problem Solving",
];

/// Alternative spellings mapped onto their canonical vocabulary entry.
pub const SKILL_ALIASES: &[(&str, &str)] = &[
    ("js", "JavaScript"),
    ("golang", "Go"),
    ("nodejs", "Node.js"),
    ("reactjs", "React"),
    ("react.js", "React"),
    ("vue.js", "Vue"),
    ("postgres", "PostgreSQL"),
    ("mssql", "SQL Server"),
    ("k8s", "Kubernetes"),
    ("ms excel", "Excel"),
    ("microsoft excel", "Excel"),
    ("powerbi", "Power BI"),
    ("ms office", "Microsoft Office"),
    ("dotnet", ".NET"),
    ("c sharp", "C#"),
    ("customer support", "Customer Service"),
    ("team player", "Teamwork"),
];

/// Industries in lookup order, each with the phrases that signal it.
/// The first industry with any phrase present wins.
pub const INDUSTRIES: &[(&str, &[&str])] = &[
    (
        "Information Technology",
        &["information technology", "software", "developer", "it support", "programming"],
    ),
    (
        "Finance",
        &["finance", "financial", "banking", "accounting", "investment", "insurance"],
    ),
    (
        "Healthcare",
        &["healthcare", "hospital", "nursing", "medical", "pharmacy", "clinic"],
    ),
    ("Mining", &["mining", "mineral", "mine"]),
    ("Engineering", &["engineering", "civil", "mechanical", "electrical"]),
    ("Manufacturing", &["manufacturing", "factory", "production line"]),
    ("Telecommunications", &["telecommunications", "telecom", "telco"]),
    ("Retail", &["retail", "merchandising", "store manager"]),
    ("Education", &["education", "teaching", "teacher", "lecturer", "school"]),
    ("Hospitality", &["hospitality", "hotel", "tourism", "restaurant"]),
    ("Logistics", &["logistics", "supply chain", "transport", "warehouse"]),
    ("Government", &["government", "public sector", "municipality"]),
    ("Agriculture", &["agriculture", "farming", "agri"]),
    ("Legal", &["legal", "law firm", "attorney", "paralegal"]),
    ("Marketing", &["marketing", "advertising", "media"]),
];

pub const GENERAL_INDUSTRY: &str = "General";

/// The nine provinces of South Africa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Province {
    Gauteng,
    WesternCape,
    KwaZuluNatal,
    EasternCape,
    FreeState,
    Limpopo,
    Mpumalanga,
    NorthWest,
    NorthernCape,
}

/// Lowercase province names and abbreviations.
pub const PROVINCE_NAMES: &[(&str, Province)] = &[
    ("gauteng", Province::Gauteng),
    ("western cape", Province::WesternCape),
    ("kwazulu-natal", Province::KwaZuluNatal),
    ("kwazulu natal", Province::KwaZuluNatal),
    ("kzn", Province::KwaZuluNatal),
    ("eastern cape", Province::EasternCape),
    ("free state", Province::FreeState),
    ("limpopo", Province::Limpopo),
    ("mpumalanga", Province::Mpumalanga),
    ("north west", Province::NorthWest),
    ("northern cape", Province::NorthernCape),
];

/// Cities and metros mapped to the province they sit in.
pub const CITY_PROVINCES: &[(&str, Province)] = &[
    ("johannesburg", Province::Gauteng),
    ("joburg", Province::Gauteng),
    ("pretoria", Province::Gauteng),
    ("tshwane", Province::Gauteng),
    ("sandton", Province::Gauteng),
    ("midrand", Province::Gauteng),
    ("centurion", Province::Gauteng),
    ("randburg", Province::Gauteng),
    ("roodepoort", Province::Gauteng),
    ("soweto", Province::Gauteng),
    ("ekurhuleni", Province::Gauteng),
    ("germiston", Province::Gauteng),
    ("kempton park", Province::Gauteng),
    ("cape town", Province::WesternCape),
    ("stellenbosch", Province::WesternCape),
    ("bellville", Province::WesternCape),
    ("paarl", Province::WesternCape),
    ("george", Province::WesternCape),
    ("durban", Province::KwaZuluNatal),
    ("umhlanga", Province::KwaZuluNatal),
    ("pietermaritzburg", Province::KwaZuluNatal),
    ("ballito", Province::KwaZuluNatal),
    ("richards bay", Province::KwaZuluNatal),
    ("gqeberha", Province::EasternCape),
    ("port elizabeth", Province::EasternCape),
    ("east london", Province::EasternCape),
    ("mthatha", Province::EasternCape),
    ("bloemfontein", Province::FreeState),
    ("welkom", Province::FreeState),
    ("polokwane", Province::Limpopo),
    ("tzaneen", Province::Limpopo),
    ("mbombela", Province::Mpumalanga),
    ("nelspruit", Province::Mpumalanga),
    ("witbank", Province::Mpumalanga),
    ("emalahleni", Province::Mpumalanga),
    ("rustenburg", Province::NorthWest),
    ("mahikeng", Province::NorthWest),
    ("potchefstroom", Province::NorthWest),
    ("kimberley", Province::NorthernCape),
    ("upington", Province::NorthernCape),
];

/// Work-mode phrases that make a job location-flexible.
pub const REMOTE_MARKERS: &[&str] = &["remote", "hybrid", "work from home", "wfh"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_point_at_vocabulary_entries() {
        for (alias, canonical) in SKILL_ALIASES {
            assert!(
                SKILL_VOCABULARY.contains(canonical),
                "alias '{alias}' maps to unknown skill '{canonical}'"
            );
        }
    }

    #[test]
    fn test_every_province_has_a_city() {
        for (_, province) in PROVINCE_NAMES {
            assert!(CITY_PROVINCES.iter().any(|(_, p)| p == province));
        }
    }
}
