use crate::error::{DispatchError, DispatchResult};

/// A parsed invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    SubmitVote { payload: Vec<u8> },
    CheckConsensus { contract_id: String, level: i64 },
    RegisterContract { payload: Vec<u8> },
    UpdateStatus { contract_id: String, status: String },
    GetContract { contract_id: String },
    Subscribe { payload: Vec<u8> },
    Broadcast { contract_id: String, country: String },
    GetSubscribers { country: String },
    GetVote { contract_id: String, voter_org: String },
    GetVotes { contract_id: String },
    GetTally { contract_id: String, level: i64 },
    ListContracts,
}

impl Command {
    /// Every function name accepted by [`Command::parse`].
    pub const FUNCTIONS: [&'static str; 12] = [
        "SubmitVote",
        "CheckConsensus",
        "RegisterContract",
        "UpdateStatus",
        "GetContract",
        "Subscribe",
        "Broadcast",
        "GetSubscribers",
        "GetVote",
        "GetVotes",
        "GetTally",
        "ListContracts",
    ];

    /// Parse a function name and its positional arguments.
    pub fn parse(function: &str, args: &[String]) -> DispatchResult<Self> {
        let command = match function {
            "SubmitVote" => {
                let [payload] = arity::<1>("SubmitVote", args)?;
                Self::SubmitVote {
                    payload: payload.into_bytes(),
                }
            }
            "CheckConsensus" => {
                let [contract_id, level] = arity::<2>("CheckConsensus", args)?;
                Self::CheckConsensus {
                    contract_id,
                    level: parse_level("CheckConsensus", &level)?,
                }
            }
            "RegisterContract" => {
                let [payload] = arity::<1>("RegisterContract", args)?;
                Self::RegisterContract {
                    payload: payload.into_bytes(),
                }
            }
            "UpdateStatus" => {
                let [contract_id, status] = arity::<2>("UpdateStatus", args)?;
                Self::UpdateStatus {
                    contract_id,
                    status,
                }
            }
            "GetContract" => {
                let [contract_id] = arity::<1>("GetContract", args)?;
                Self::GetContract { contract_id }
            }
            "Subscribe" => {
                let [payload] = arity::<1>("Subscribe", args)?;
                Self::Subscribe {
                    payload: payload.into_bytes(),
                }
            }
            "Broadcast" => {
                let [contract_id, country] = arity::<2>("Broadcast", args)?;
                Self::Broadcast {
                    contract_id,
                    country,
                }
            }
            "GetSubscribers" => {
                let [country] = arity::<1>("GetSubscribers", args)?;
                Self::GetSubscribers { country }
            }
            "GetVote" => {
                let [contract_id, voter_org] = arity::<2>("GetVote", args)?;
                Self::GetVote {
                    contract_id,
                    voter_org,
                }
            }
            "GetVotes" => {
                let [contract_id] = arity::<1>("GetVotes", args)?;
                Self::GetVotes { contract_id }
            }
            "GetTally" => {
                let [contract_id, level] = arity::<2>("GetTally", args)?;
                Self::GetTally {
                    contract_id,
                    level: parse_level("GetTally", &level)?,
                }
            }
            "ListContracts" => {
                let [] = arity::<0>("ListContracts", args)?;
                Self::ListContracts
            }
            other => return Err(DispatchError::UnknownFunction(other.to_string())),
        };
        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitVote { .. } => "SubmitVote",
            Self::CheckConsensus { .. } => "CheckConsensus",
            Self::RegisterContract { .. } => "RegisterContract",
            Self::UpdateStatus { .. } => "UpdateStatus",
            Self::GetContract { .. } => "GetContract",
            Self::Subscribe { .. } => "Subscribe",
            Self::Broadcast { .. } => "Broadcast",
            Self::GetSubscribers { .. } => "GetSubscribers",
            Self::GetVote { .. } => "GetVote",
            Self::GetVotes { .. } => "GetVotes",
            Self::GetTally { .. } => "GetTally",
            Self::ListContracts => "ListContracts",
        }
    }

    /// Returns `true` if the command never writes state or emits events.
    pub fn is_read_only(&self) -> bool {
        !matches!(
            self,
            Self::SubmitVote { .. }
                | Self::RegisterContract { .. }
                | Self::UpdateStatus { .. }
                | Self::Subscribe { .. }
                | Self::Broadcast { .. }
        )
    }
}

fn arity<const N: usize>(function: &'static str, args: &[String]) -> DispatchResult<[String; N]> {
    <[String; N]>::try_from(args.to_vec()).map_err(|got| DispatchError::BadArguments {
        function,
        reason: format!("expected {N} argument(s), got {}", got.len()),
    })
}

fn parse_level(function: &'static str, raw: &str) -> DispatchResult<i64> {
    raw.trim().parse().map_err(|_| DispatchError::BadArguments {
        function,
        reason: format!("level must be an integer, got {raw:?}"),
    })
}
