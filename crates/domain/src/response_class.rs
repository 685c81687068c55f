/// Response typification used by DNS64 to decide whether to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseClass {
    /// Success with at least one record answering the question.
    NoError,
    /// No usable answer for the question type (RFC 6147 §5.1.2 folds most
    /// error codes with an empty answer into this class).
    NoData,
    /// NXDOMAIN.
    NameError,
    /// An error code with a non-empty answer section.
    Other,
}

impl ResponseClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoError => "NOERROR",
            Self::NoData => "NODATA",
            Self::NameError => "NXDOMAIN",
            Self::Other => "OTHERERROR",
        }
    }
}

impl std::fmt::Display for ResponseClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
