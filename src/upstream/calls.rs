//! Catalogue of registry operations.
//!
//! Every upstream request the gateway makes is one `UpstreamCall`. The
//! call knows its stable name (for logs and metrics) and the path segments
//! it maps to below the configured base URL.

use std::fmt;
use std::str::FromStr;

/// Grouping used by the visualization endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisualizationCategory {
    #[default]
    Universities,
    Students,
    Lecturers,
    Programs,
}

impl VisualizationCategory {
    pub const ALL: [VisualizationCategory; 4] = [
        VisualizationCategory::Universities,
        VisualizationCategory::Students,
        VisualizationCategory::Lecturers,
        VisualizationCategory::Programs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisualizationCategory::Universities => "universities",
            VisualizationCategory::Students => "students",
            VisualizationCategory::Lecturers => "lecturers",
            VisualizationCategory::Programs => "programs",
        }
    }

    /// Output field name and upstream series for each chart of the category.
    pub fn series(&self) -> [(&'static str, &'static str); 4] {
        match self {
            VisualizationCategory::Universities => [
                ("by_form", "bentuk"),
                ("by_accreditation", "akreditasi"),
                ("by_province", "provinsi"),
                ("by_supervisor_group", "kelompok-pembina"),
            ],
            VisualizationCategory::Students => [
                ("by_field", "bidang"),
                ("by_gender", "jenis-kelamin"),
                ("by_level", "jenjang"),
                ("by_status", "status"),
            ],
            VisualizationCategory::Lecturers => [
                ("by_activity", "keaktifan"),
                ("by_field", "bidang"),
                ("by_gender", "jenis-kelamin"),
                ("by_level", "jenjang"),
            ],
            VisualizationCategory::Programs => [
                ("by_level", "jenjang"),
                ("by_accreditation", "akreditasi"),
                ("by_field", "bidang-ilmu"),
                ("by_supervisor_group", "kelompok-pembina"),
            ],
        }
    }

    fn upstream_entity(&self) -> &'static str {
        match self {
            VisualizationCategory::Universities => "pt",
            VisualizationCategory::Students => "mahasiswa",
            VisualizationCategory::Lecturers => "dosen",
            VisualizationCategory::Programs => "prodi",
        }
    }
}

impl fmt::Display for VisualizationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a category name is not one of the four known ones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid category. Valid options: universities, students, lecturers, programs")]
pub struct UnknownCategory;

impl FromStr for VisualizationCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisualizationCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(UnknownCategory)
    }
}

/// A single registry operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamCall {
    SearchAll(String),
    SearchUniversities(String),
    SearchStudents(String),
    SearchLecturers(String),
    SearchPrograms(String),

    UniversityDetail(String),
    UniversityPrograms { id: String, semester: String },
    UniversityLogo(String),
    UniversityStudentCount(String),
    UniversityLecturerCount(String),
    UniversityProgramCount(String),
    UniversityRatio(String),
    UniversityGraduationRate(String),
    UniversityCostRange(String),

    StudentDetail(String),

    LecturerProfile(String),
    LecturerResearch(String),
    LecturerCommunityService(String),
    LecturerPublications(String),
    LecturerPatents(String),

    ProgramDetail(String),
    ProgramDescription(String),

    ActiveLecturerCount,
    ActiveStudentCount,
    ProgramCount,
    UniversityCount,

    Visualization {
        category: VisualizationCategory,
        series: &'static str,
    },
}

impl UpstreamCall {
    /// Stable identifier used in logs and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            UpstreamCall::SearchAll(_) => "search_all",
            UpstreamCall::SearchUniversities(_) => "search_universities",
            UpstreamCall::SearchStudents(_) => "search_students",
            UpstreamCall::SearchLecturers(_) => "search_lecturers",
            UpstreamCall::SearchPrograms(_) => "search_programs",
            UpstreamCall::UniversityDetail(_) => "university_detail",
            UpstreamCall::UniversityPrograms { .. } => "university_programs",
            UpstreamCall::UniversityLogo(_) => "university_logo",
            UpstreamCall::UniversityStudentCount(_) => "university_student_count",
            UpstreamCall::UniversityLecturerCount(_) => "university_lecturer_count",
            UpstreamCall::UniversityProgramCount(_) => "university_program_count",
            UpstreamCall::UniversityRatio(_) => "university_ratio",
            UpstreamCall::UniversityGraduationRate(_) => "university_graduation_rate",
            UpstreamCall::UniversityCostRange(_) => "university_cost_range",
            UpstreamCall::StudentDetail(_) => "student_detail",
            UpstreamCall::LecturerProfile(_) => "lecturer_profile",
            UpstreamCall::LecturerResearch(_) => "lecturer_research",
            UpstreamCall::LecturerCommunityService(_) => "lecturer_community_service",
            UpstreamCall::LecturerPublications(_) => "lecturer_publications",
            UpstreamCall::LecturerPatents(_) => "lecturer_patents",
            UpstreamCall::ProgramDetail(_) => "program_detail",
            UpstreamCall::ProgramDescription(_) => "program_description",
            UpstreamCall::ActiveLecturerCount => "active_lecturer_count",
            UpstreamCall::ActiveStudentCount => "active_student_count",
            UpstreamCall::ProgramCount => "program_count",
            UpstreamCall::UniversityCount => "university_count",
            UpstreamCall::Visualization { .. } => "visualization",
        }
    }

    /// Path segments below the upstream base URL, unencoded.
    pub fn path_segments(&self) -> Vec<&str> {
        match self {
            UpstreamCall::SearchAll(q) => vec!["pencarian", "all", q.as_str()],
            UpstreamCall::SearchUniversities(q) => vec!["pencarian", "pt", q.as_str()],
            UpstreamCall::SearchStudents(q) => vec!["pencarian", "mhs", q.as_str()],
            UpstreamCall::SearchLecturers(q) => vec!["pencarian", "dosen", q.as_str()],
            UpstreamCall::SearchPrograms(q) => vec!["pencarian", "prodi", q.as_str()],
            UpstreamCall::UniversityDetail(id) => vec!["pt", "detail", id.as_str()],
            UpstreamCall::UniversityPrograms { id, semester } => vec!["pt", "prodi", id.as_str(), semester.as_str()],
            UpstreamCall::UniversityLogo(id) => vec!["pt", "logo", id.as_str()],
            UpstreamCall::UniversityStudentCount(id) => vec!["pt", "jumlah-mahasiswa", id.as_str()],
            UpstreamCall::UniversityLecturerCount(id) => vec!["pt", "jumlah-dosen", id.as_str()],
            UpstreamCall::UniversityProgramCount(id) => vec!["pt", "jumlah-prodi", id.as_str()],
            UpstreamCall::UniversityRatio(id) => vec!["pt", "rasio", id.as_str()],
            UpstreamCall::UniversityGraduationRate(id) => vec!["pt", "graduation-rate", id.as_str()],
            UpstreamCall::UniversityCostRange(id) => vec!["pt", "cost-range", id.as_str()],
            UpstreamCall::StudentDetail(id) => vec!["detail", "mhs", id.as_str()],
            UpstreamCall::LecturerProfile(id) => vec!["dosen", "profile", id.as_str()],
            UpstreamCall::LecturerResearch(id) => vec!["dosen", "portofolio", "penelitian", id.as_str()],
            UpstreamCall::LecturerCommunityService(id) => {
                vec!["dosen", "portofolio", "pengabdian", id.as_str()]
            }
            UpstreamCall::LecturerPublications(id) => vec!["dosen", "portofolio", "karya", id.as_str()],
            UpstreamCall::LecturerPatents(id) => vec!["dosen", "portofolio", "paten", id.as_str()],
            UpstreamCall::ProgramDetail(id) => vec!["prodi", "detail", id.as_str()],
            UpstreamCall::ProgramDescription(id) => vec!["prodi", "desc", id.as_str()],
            UpstreamCall::ActiveLecturerCount => vec!["dosen", "count-active"],
            UpstreamCall::ActiveStudentCount => vec!["mahasiswa", "count-active"],
            UpstreamCall::ProgramCount => vec!["prodi", "count"],
            UpstreamCall::UniversityCount => vec!["pt", "count"],
            UpstreamCall::Visualization { category, series } => {
                vec![category.upstream_entity(), "visualisasi", *series]
            }
        }
    }

    /// The logo endpoint answers with a bare base64 string, not JSON.
    pub fn accepts_plain_text(&self) -> bool {
        matches!(self, UpstreamCall::UniversityLogo(_))
    }
}

impl fmt::Display for UpstreamCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segments().join("/"))
    }
}
