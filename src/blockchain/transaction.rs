//! Transfer planning and message assembly.
//!
//! A `TransferPlan` is the list of instructions for one withdrawal plus the
//! figures the balance pre-check needs. Account lookups happen before a plan
//! is built; the plan itself never touches the network.

use solana_sdk::{hash::Hash, instruction::Instruction, message::Message, pubkey::Pubkey, system_instruction};

use crate::blockchain::token::{self, TokenError};

/// Instructions for a single withdrawal.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    /// Account creations (if any) followed by exactly one transfer.
    pub instructions: Vec<Instruction>,
    /// Amount moved, in the asset's base units.
    pub base_units: u64,
    /// Lamports leaving the operator besides fees and rent.
    pub native_lamports: u64,
    /// Number of token accounts this plan creates.
    pub created_accounts: u64,
}

impl TransferPlan {
    /// System-program transfer of `lamports` from `from` to `to`.
    pub fn native(from: &Pubkey, to: &Pubkey, lamports: u64) -> Self {
        Self {
            instructions: vec![system_instruction::transfer(from, to, lamports)],
            base_units: lamports,
            native_lamports: lamports,
            created_accounts: 0,
        }
    }

    /// Token transfer between associated accounts of `authority` and
    /// `recipient`. `missing_owners` lists the wallets whose associated
    /// account does not exist yet; each gets a create instruction paid by
    /// `authority`.
    pub fn token(
        authority: &Pubkey,
        recipient: &Pubkey,
        mint: &Pubkey,
        missing_owners: &[Pubkey],
        amount: u64,
        decimals: u8,
    ) -> Result<Self, TokenError> {
        let mut instructions: Vec<Instruction> = missing_owners
            .iter()
            .map(|owner| token::create_account_instruction(authority, owner, mint))
            .collect();

        let source = token::associated_account(authority, mint);
        let destination = token::associated_account(recipient, mint);
        instructions.push(token::transfer_instruction(
            &source,
            mint,
            &destination,
            authority,
            amount,
            decimals,
        )?);

        Ok(Self {
            instructions,
            base_units: amount,
            native_lamports: 0,
            created_accounts: missing_owners.len() as u64,
        })
    }

    /// Compile the plan into a message with `payer` as fee payer.
    pub fn message(&self, payer: &Pubkey, recent_blockhash: &Hash) -> Message {
        Message::new_with_blockhash(&self.instructions, Some(payer), recent_blockhash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::system_program;

    #[test]
    fn test_native_plan() {
        let from = Pubkey::new_unique();
        let to = Pubkey::new_unique();
        let plan = TransferPlan::native(&from, &to, 1_000_000_000);

        assert_eq!(plan.instructions.len(), 1);
        assert_eq!(plan.instructions[0].program_id, system_program::id());
        assert_eq!(plan.native_lamports, 1_000_000_000);
        assert_eq!(plan.created_accounts, 0);

        let message = plan.message(&from, &Hash::new_unique());
        assert_eq!(message.account_keys[0], from);
        assert_eq!(message.header.num_required_signatures, 1);
    }

    #[test]
    fn test_token_plan_creates_missing_accounts_first() {
        let authority = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let plan = TransferPlan::token(&authority, &recipient, &mint, &[recipient], 5_000_000, 6).unwrap();

        assert_eq!(plan.instructions.len(), 2);
        assert_eq!(plan.instructions[0].program_id, spl_associated_token_account::id());
        assert_eq!(plan.instructions[1].program_id, spl_token::id());
        assert_eq!(plan.created_accounts, 1);
        assert_eq!(plan.native_lamports, 0);
        assert_eq!(plan.base_units, 5_000_000);
    }

    #[test]
    fn test_token_plan_without_creations() {
        let authority = Pubkey::new_unique();
        let plan =
            TransferPlan::token(&authority, &Pubkey::new_unique(), &Pubkey::new_unique(), &[], 1, 0).unwrap();
        assert_eq!(plan.instructions.len(), 1);
        assert_eq!(plan.created_accounts, 0);
    }
}
