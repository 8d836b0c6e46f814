use serde::Deserialize;

use ratingsapp_core::errors::{AppError, ErrorCode};

/// `?id=1,2,3` on the user and role list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdsQuery {
    pub id: Option<String>,
}

impl IdsQuery {
    /// Parsed id list. `None` lists everything.
    pub fn ids(&self) -> Result<Option<Vec<i64>>, AppError> {
        let Some(raw) = self.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        raw.split(',')
            .map(|part| part.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
            .map_err(|_| AppError::field("id", ErrorCode::InvalidParse))
    }
}

/// `?target=N` on the rating list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingsQuery {
    pub target: Option<String>,
}

impl RatingsQuery {
    pub fn target(&self) -> Result<i64, AppError> {
        self.target
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::field("target", ErrorCode::Required))?
            .parse()
            .map_err(|_| AppError::field("target", ErrorCode::InvalidParse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_parse() {
        let query = IdsQuery {
            id: Some("1, 2,5".into()),
        };
        assert_eq!(query.ids().unwrap(), Some(vec![1, 2, 5]));
        assert_eq!(IdsQuery::default().ids().unwrap(), None);
    }

    #[test]
    fn test_ids_malformed() {
        let query = IdsQuery {
            id: Some("1,x".into()),
        };
        let Err(AppError::Validation(errors)) = query.ids() else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("id"), Some(ErrorCode::InvalidParse));
    }

    #[test]
    fn test_target_parse() {
        let query = RatingsQuery {
            target: Some("abc".into()),
        };
        assert!(query.target().is_err());
        let query = RatingsQuery {
            target: Some("9999".into()),
        };
        assert_eq!(query.target().unwrap(), 9999);
    }
}
