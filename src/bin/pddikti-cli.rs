use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "pddikti-cli")]
#[command(about = "Query a running PDDIKTI gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search one kind of record, or everything
    Search {
        #[arg(value_enum)]
        kind: SearchKind,
        query: String,
    },
    /// Show a single record by id
    Show {
        #[arg(value_enum)]
        kind: RecordKind,
        id: String,
    },
    /// Programs a university offered in one semester
    Programs {
        id: String,
        /// Semester as YYYYS, e.g. 20241
        semester: String,
    },
    /// Aggregated statistics for a university
    Stats { id: String },
    /// Registry-wide counts
    Counts,
    /// Chart data for a category (universities, students, lecturers, programs)
    Charts { category: Option<String> },
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchKind {
    All,
    Universities,
    Students,
    Lecturers,
    Programs,
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordKind {
    University,
    Logo,
    Student,
    Lecturer,
    Research,
    Program,
}

impl SearchKind {
    fn path(self) -> &'static str {
        match self {
            SearchKind::All => "/api/v1/search",
            SearchKind::Universities => "/api/v1/universities/search",
            SearchKind::Students => "/api/v1/students/search",
            SearchKind::Lecturers => "/api/v1/lecturers/search",
            SearchKind::Programs => "/api/v1/programs/search",
        }
    }
}

impl RecordKind {
    fn path(self, id: &str) -> String {
        match self {
            RecordKind::University => format!("/api/v1/universities/{id}"),
            RecordKind::Logo => format!("/api/v1/universities/{id}/logo"),
            RecordKind::Student => format!("/api/v1/students/{id}"),
            RecordKind::Lecturer => format!("/api/v1/lecturers/{id}"),
            RecordKind::Research => format!("/api/v1/lecturers/{id}/research"),
            RecordKind::Program => format!("/api/v1/programs/{id}"),
        }
    }
}

fn build_request(client: &reqwest::Client, base: &str, command: Commands) -> reqwest::RequestBuilder {
    let base = base.trim_end_matches('/');
    match command {
        Commands::Search { kind, query } => client
            .get(format!("{base}{}", kind.path()))
            .query(&[("q", query)]),
        Commands::Show { kind, id } => client.get(format!("{base}{}", kind.path(&id))),
        Commands::Programs { id, semester } => client
            .get(format!("{base}/api/v1/universities/{id}/programs"))
            .query(&[("semester", semester)]),
        Commands::Stats { id } => client.get(format!("{base}/api/v1/universities/{id}/stats")),
        Commands::Counts => client.get(format!("{base}/api/v1/statistics/counts")),
        Commands::Charts { category } => {
            let request = client.get(format!("{base}/api/v1/statistics/visualizations"));
            match category {
                Some(category) => request.query(&[("category", category)]),
                None => request,
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let request = build_request(&client, &cli.url, cli.command);
    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) if status.is_success() => println!("{}", serde_json::to_string_pretty(&json)?),
        Ok(json) => {
            eprintln!("Error: gateway returned status {}", status);
            eprintln!("{}", serde_json::to_string_pretty(&json)?);
        }
        Err(_) => {
            eprintln!("Error: gateway returned status {}", status);
            eprintln!("Response: {}", text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_for(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        let client = reqwest::Client::new();
        build_request(&client, &cli.url, cli.command).build().unwrap().url().to_string()
    }

    #[test]
    fn test_programs_sends_semester() {
        assert_eq!(
            url_for(&["pddikti-cli", "programs", "u1", "20241"]),
            "http://localhost:5000/api/v1/universities/u1/programs?semester=20241"
        );
        assert!(Cli::try_parse_from(["pddikti-cli", "programs", "u1"]).is_err());
    }

    #[test]
    fn test_search_and_show_paths() {
        assert_eq!(
            url_for(&["pddikti-cli", "--url", "http://gw:8080/", "search", "lecturers", "budi santoso"]),
            "http://gw:8080/api/v1/lecturers/search?q=budi+santoso"
        );
        assert_eq!(
            url_for(&["pddikti-cli", "show", "research", "d1"]),
            "http://localhost:5000/api/v1/lecturers/d1/research"
        );
        assert_eq!(
            url_for(&["pddikti-cli", "charts"]),
            "http://localhost:5000/api/v1/statistics/visualizations"
        );
    }
}
