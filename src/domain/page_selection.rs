use super::ValidationError;

/// Which pages of a document a request covers.
///
/// Page numbers are 1-based. `0` is reserved as the "all pages" sentinel and is
/// only accepted on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    #[default]
    All,
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Hard cap on pages rendered for a single model request.
    pub const MAX_PAGES_PER_REQUEST: u32 = 20;

    pub fn from_pages(pages: Vec<u32>) -> Result<Self, ValidationError> {
        if pages.is_empty() || pages == [0] {
            return Ok(Self::All);
        }
        if pages.contains(&0) {
            return Err(ValidationError::ZeroPageMixed);
        }
        Ok(Self::Pages(pages))
    }

    /// Number of explicitly requested pages, `None` for [`PageSelection::All`].
    pub fn explicit_len(&self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Pages(pages) => Some(pages.len()),
        }
    }

    /// Concrete page numbers for a document of `total_pages`.
    ///
    /// `All` is capped at `cap` pages; explicit pages must exist in the document.
    pub fn resolve(&self, total_pages: u32, cap: u32) -> Result<Vec<u32>, ValidationError> {
        if total_pages == 0 {
            return Err(ValidationError::EmptyDocument);
        }
        match self {
            Self::All => Ok((1..=total_pages.min(cap)).collect()),
            Self::Pages(pages) => {
                if let Some(&page) = pages.iter().find(|&&p| p > total_pages) {
                    return Err(ValidationError::PageOutOfRange { page, total_pages });
                }
                Ok(pages.clone())
            }
        }
    }
}
