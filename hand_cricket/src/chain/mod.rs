//! External program collaboration.
//!
//! The tracker decides outcomes; this module describes the matching call to
//! the on-chain tournament program and hands it to a [`ChainGateway`] for
//! encoding. Signing and broadcasting stay with the client.

pub mod gateway;
pub mod instruction;

pub use gateway::{ChainGateway, GatewayError, GatewayResult, InstructionEncoder, PreparedTransaction};
pub use instruction::{
    AccountAddress, AccountMeta, DEFAULT_PROGRAM_ID, InstructionRequest, ProgramInstruction, Seed,
    discriminator,
};
