use error::CombinedError;

use crate::{ErrorPolicy, Outcome};

/// What the caller ultimately receives on the success path. `error` is
/// only ever populated under [`ErrorPolicy::All`].
#[derive(Debug, Clone, Default)]
pub struct FinalResponse {
    pub data: Option<serde_json::Value>,
    pub error: Option<CombinedError>,
}

/// Applies the active policy to a terminal outcome, deciding what the
/// caller sees. Consumes the outcome: it is assembled exactly once.
pub fn assemble(outcome: Outcome, policy: ErrorPolicy) -> Result<FinalResponse, CombinedError> {
    match policy {
        // Everything is delivered, nothing rejects: the caller inspects
        // both channels itself.
        ErrorPolicy::All => {
            let (data, error) = match outcome {
                Outcome::Failure(error) => (None, Some(CombinedError::from_network(error))),
                Outcome::Response { data, errors } => {
                    let error = (!errors.is_empty()).then(|| CombinedError::from_graphql(errors));
                    (data, error)
                }
            };
            Ok(FinalResponse { data, error })
        }
        ErrorPolicy::None | ErrorPolicy::Ignore => match outcome {
            // Transport failures reject under both policies: their
            // presence means no reliable data exists at all.
            Outcome::Failure(error) => Err(CombinedError::from_network(error)),
            Outcome::Response { data, errors } => {
                if errors.is_empty() || policy == ErrorPolicy::Ignore {
                    Ok(FinalResponse { data, error: None })
                } else {
                    Err(CombinedError::from_graphql(errors))
                }
            }
        },
    }
}
