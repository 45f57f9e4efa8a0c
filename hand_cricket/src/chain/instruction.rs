//! Descriptions of the external program calls implied by tracker results.
//!
//! Discriminators follow the Anchor convention: the first eight bytes of
//! `sha256("global:<instruction_name>")`.

use crate::identity::PlayerId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Program id of the deployed tournament program
pub const DEFAULT_PROGRAM_ID: &str = "G9QiQW9iym33zfbsXTCoEp5bKCwgFf3KY5VB3UHKSW4w";

/// Native system program
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";

/// Seed of the tournament account
pub const TOURNAMENT_SEED: &str = "tournament";

/// Seed prefix of per-player stats accounts
pub const PLAYER_STATS_SEED: &str = "player-stats";

/// Compute an Anchor instruction discriminator
pub fn discriminator(name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("global:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Program instruction with its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ProgramInstruction {
    RegisterPlayer,
    PlayTurn { choice: u8 },
    EndTournament { winners: Vec<PlayerId> },
}

impl ProgramInstruction {
    /// Instruction name as declared by the program
    pub fn name(&self) -> &'static str {
        match self {
            ProgramInstruction::RegisterPlayer => "register_player",
            ProgramInstruction::PlayTurn { .. } => "play_turn",
            ProgramInstruction::EndTournament { .. } => "end_tournament",
        }
    }

    /// Instruction data: discriminator followed by Borsh-encoded arguments
    pub fn data(&self) -> Vec<u8> {
        let mut data = discriminator(self.name()).to_vec();
        if let ProgramInstruction::PlayTurn { choice } = self {
            data.push(*choice);
        }
        data
    }
}

/// Seed component of a derived address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Seed {
    /// UTF-8 literal
    Literal(String),
    /// Key bytes of another account
    Account(Box<AccountAddress>),
}

/// Where an account's address comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountAddress {
    /// Known key
    Key { key: PlayerId },
    /// Program-derived address, resolved by the gateway
    Derived { seeds: Vec<Seed> },
}

impl AccountAddress {
    fn key(key: PlayerId) -> Self {
        AccountAddress::Key { key }
    }

    fn tournament() -> Self {
        AccountAddress::Derived {
            seeds: vec![Seed::Literal(TOURNAMENT_SEED.to_string())],
        }
    }

    fn player_stats(player: &PlayerId) -> Self {
        AccountAddress::Derived {
            seeds: vec![
                Seed::Literal(PLAYER_STATS_SEED.to_string()),
                Seed::Account(Box::new(Self::tournament())),
                Seed::Account(Box::new(Self::key(player.clone()))),
            ],
        }
    }

    fn game_account(player: &PlayerId) -> Self {
        AccountAddress::Derived {
            seeds: vec![Seed::Account(Box::new(Self::key(player.clone())))],
        }
    }

    fn system_program() -> Self {
        // Constant is a valid key
        match PlayerId::parse(SYSTEM_PROGRAM_ID) {
            Ok(key) => Self::key(key),
            Err(_) => Self::key(PlayerId::from_bytes([0; 32])),
        }
    }
}

/// One account passed to the instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    /// Role name as declared by the program
    pub name: String,
    pub address: AccountAddress,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    fn new(name: &str, address: AccountAddress, is_signer: bool, is_writable: bool) -> Self {
        Self {
            name: name.to_string(),
            address,
            is_signer,
            is_writable,
        }
    }
}

/// Complete description of one unsigned program call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionRequest {
    pub program_id: PlayerId,
    pub instruction: ProgramInstruction,
    pub fee_payer: PlayerId,
    pub accounts: Vec<AccountMeta>,
    /// Compute unit price in micro-lamports
    pub compute_unit_price: u64,
}

/// Default compute unit price in micro-lamports
pub const DEFAULT_COMPUTE_UNIT_PRICE: u64 = 1_000;

impl InstructionRequest {
    /// `register_player`: pays the entry fee and creates the stats account
    pub fn register(program_id: PlayerId, player: PlayerId) -> Self {
        let accounts = vec![
            AccountMeta::new("tournament", AccountAddress::tournament(), false, true),
            AccountMeta::new(
                "player_stats",
                AccountAddress::player_stats(&player),
                false,
                true,
            ),
            AccountMeta::new("player", AccountAddress::key(player.clone()), true, true),
            AccountMeta::new(
                "system_program",
                AccountAddress::system_program(),
                false,
                false,
            ),
        ];

        Self {
            program_id,
            instruction: ProgramInstruction::RegisterPlayer,
            fee_payer: player,
            accounts,
            compute_unit_price: DEFAULT_COMPUTE_UNIT_PRICE,
        }
    }

    /// `play_turn`: plays one hand
    pub fn play_turn(program_id: PlayerId, player: PlayerId, choice: u8) -> Self {
        let accounts = vec![
            AccountMeta::new(
                "game_account",
                AccountAddress::game_account(&player),
                false,
                true,
            ),
            AccountMeta::new(
                "player_stats",
                AccountAddress::player_stats(&player),
                false,
                true,
            ),
            AccountMeta::new("tournament", AccountAddress::tournament(), false, false),
            AccountMeta::new("player", AccountAddress::key(player.clone()), true, true),
            AccountMeta::new(
                "system_program",
                AccountAddress::system_program(),
                false,
                false,
            ),
        ];

        Self {
            program_id,
            instruction: ProgramInstruction::PlayTurn { choice },
            fee_payer: player,
            accounts,
            compute_unit_price: DEFAULT_COMPUTE_UNIT_PRICE,
        }
    }

    /// `end_tournament`: winners follow as writable remaining accounts
    pub fn end_tournament(program_id: PlayerId, admin: PlayerId, winners: Vec<PlayerId>) -> Self {
        let mut accounts = vec![
            AccountMeta::new("tournament", AccountAddress::tournament(), false, true),
            AccountMeta::new("admin", AccountAddress::key(admin.clone()), true, true),
            AccountMeta::new(
                "system_program",
                AccountAddress::system_program(),
                false,
                false,
            ),
        ];
        accounts.extend(
            winners
                .iter()
                .map(|w| AccountMeta::new("winner", AccountAddress::key(w.clone()), false, true)),
        );

        Self {
            program_id,
            instruction: ProgramInstruction::EndTournament { winners },
            fee_payer: admin,
            accounts,
            compute_unit_price: DEFAULT_COMPUTE_UNIT_PRICE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program() -> PlayerId {
        PlayerId::parse(DEFAULT_PROGRAM_ID).unwrap()
    }

    #[test]
    fn test_play_turn_discriminator_matches_program() {
        assert_eq!(
            discriminator("play_turn"),
            [116, 200, 44, 67, 23, 228, 209, 99]
        );
    }

    #[test]
    fn test_play_turn_data_appends_choice() {
        let data = ProgramInstruction::PlayTurn { choice: 4 }.data();
        assert_eq!(data.len(), 9);
        assert_eq!(data[8], 4);
    }

    #[test]
    fn test_register_data_is_discriminator_only() {
        let data = ProgramInstruction::RegisterPlayer.data();
        assert_eq!(data, discriminator("register_player").to_vec());
    }

    #[test]
    fn test_register_accounts() {
        let player = PlayerId::from_bytes([1; 32]);
        let request = InstructionRequest::register(program(), player.clone());
        assert_eq!(request.fee_payer, player);

        let names: Vec<_> = request.accounts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["tournament", "player_stats", "player", "system_program"]
        );
        let signers: Vec<_> = request.accounts.iter().filter(|a| a.is_signer).collect();
        assert_eq!(signers.len(), 1);
        assert_eq!(signers[0].address, AccountAddress::Key { key: player });
    }

    #[test]
    fn test_end_tournament_appends_winners() {
        let admin = PlayerId::from_bytes([9; 32]);
        let winners = vec![PlayerId::from_bytes([1; 32]), PlayerId::from_bytes([2; 32])];
        let request = InstructionRequest::end_tournament(program(), admin, winners);
        assert_eq!(request.accounts.len(), 5);
        assert!(request.accounts[3..].iter().all(|a| a.is_writable && !a.is_signer));
    }

    #[test]
    fn test_request_serializes() {
        let request = InstructionRequest::play_turn(program(), PlayerId::from_bytes([1; 32]), 2);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["instruction"]["name"], "play_turn");
        assert_eq!(json["instruction"]["choice"], 2);
        assert_eq!(json["accounts"][0]["address"]["kind"], "derived");
    }
}
