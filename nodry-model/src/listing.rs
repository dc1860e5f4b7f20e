/// List payload as returned by collection endpoints.
///
/// Paginated viewsets wrap rows in `{"count": .., "results": [..]}` while
/// unpaginated ones return a bare array. A `results` key that is missing or
/// `null` is read as an empty list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(untagged, bound(deserialize = "T: serde::Deserialize<'de>"))
)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Envelope {
        #[cfg_attr(
            feature = "serde",
            serde(default, deserialize_with = "null_as_empty")
        )]
        results: Vec<T>,
    },
}

#[cfg(feature = "serde")]
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(rows) | Listing::Envelope { results: rows } => rows,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Listing::Bare(rows) | Listing::Envelope { results: rows } => {
                rows.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> From<Listing<T>> for Vec<T> {
    fn from(value: Listing<T>) -> Self {
        value.into_vec()
    }
}
