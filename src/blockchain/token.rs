//! SPL token helpers: mint decoding, associated token accounts, and the
//! `transfer_checked` instruction.

use solana_sdk::{account::Account, instruction::Instruction, pubkey::Pubkey};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use spl_token::solana_program::program_pack::Pack;
use spl_token::state::{Account as TokenAccount, Mint};

/// Size of an SPL token account, which determines the rent a new one costs.
pub const TOKEN_ACCOUNT_LEN: usize = TokenAccount::LEN;

/// Error types that can occur during token operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The mint is owned by a program other than SPL Token.
    #[error("Mint {mint} is owned by {owner}, not the SPL Token program")]
    UnsupportedProgram { mint: Pubkey, owner: Pubkey },

    /// The mint account data could not be decoded.
    #[error("Invalid mint account {0}: {1}")]
    InvalidMint(Pubkey, String),

    /// Building an instruction failed.
    #[error("Instruction error: {0}")]
    Instruction(String),
}

/// Read the decimal precision out of a mint account.
pub fn mint_decimals(mint: &Pubkey, account: &Account) -> Result<u8, TokenError> {
    if account.owner != spl_token::id() {
        return Err(TokenError::UnsupportedProgram {
            mint: *mint,
            owner: account.owner,
        });
    }

    Mint::unpack(&account.data)
        .map(|state| state.decimals)
        .map_err(|e| TokenError::InvalidMint(*mint, e.to_string()))
}

/// Address of `owner`'s associated token account for `mint`.
pub fn associated_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Instruction creating `owner`'s associated token account, paid by `payer`.
///
/// The idempotent variant succeeds if the account appeared between lookup and
/// execution.
pub fn create_account_instruction(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    create_associated_token_account_idempotent(payer, owner, mint, &spl_token::id())
}

/// `transfer_checked` of `amount` base units between two token accounts.
pub fn transfer_instruction(
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Result<Instruction, TokenError> {
    spl_token::instruction::transfer_checked(
        &spl_token::id(),
        source,
        mint,
        destination,
        authority,
        &[],
        amount,
        decimals,
    )
    .map_err(|e| TokenError::Instruction(e.to_string()))
}

/// A packed, initialized mint account with the given decimals.
#[cfg(test)]
pub(crate) fn mint_account(decimals: u8) -> Account {
    use spl_token::solana_program::program_option::COption;

    let mut data = vec![0u8; Mint::LEN];
    let state = Mint {
        mint_authority: COption::None,
        supply: 1_000_000_000_000,
        decimals,
        is_initialized: true,
        freeze_authority: COption::None,
    };
    Mint::pack(state, &mut data).expect("mint packs into its own length");

    Account {
        lamports: 1_461_600,
        data,
        owner: spl_token::id(),
        executable: false,
        rent_epoch: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_token::instruction::TokenInstruction;

    #[test]
    fn test_mint_decimals() {
        let mint = Pubkey::new_unique();
        assert_eq!(mint_decimals(&mint, &mint_account(6)).unwrap(), 6);
        assert_eq!(mint_decimals(&mint, &mint_account(0)).unwrap(), 0);
    }

    #[test]
    fn test_mint_wrong_owner() {
        let mint = Pubkey::new_unique();
        let mut account = mint_account(6);
        account.owner = Pubkey::new_unique();

        let err = mint_decimals(&mint, &account).unwrap_err();
        assert!(matches!(err, TokenError::UnsupportedProgram { .. }));
    }

    #[test]
    fn test_mint_garbage_data() {
        let mint = Pubkey::new_unique();
        let mut account = mint_account(6);
        account.data.truncate(10);

        let err = mint_decimals(&mint, &account).unwrap_err();
        assert!(err.to_string().starts_with("Invalid mint account"));
    }

    #[test]
    fn test_create_account_instruction_targets_ata() {
        let payer = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let ix = create_account_instruction(&payer, &owner, &mint);

        assert_eq!(ix.program_id, spl_associated_token_account::id());
        assert_eq!(ix.accounts[0].pubkey, payer);
        assert!(ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[1].pubkey, associated_account(&owner, &mint));
        assert_eq!(ix.accounts[2].pubkey, owner);
        assert_eq!(ix.accounts[3].pubkey, mint);
    }

    #[test]
    fn test_transfer_instruction() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let source = associated_account(&owner, &mint);
        let destination = associated_account(&Pubkey::new_unique(), &mint);

        let ix = transfer_instruction(&source, &mint, &destination, &owner, 5_000_000, 6).unwrap();

        assert_eq!(ix.program_id, spl_token::id());
        match TokenInstruction::unpack(&ix.data).unwrap() {
            TokenInstruction::TransferChecked { amount, decimals } => {
                assert_eq!(amount, 5_000_000);
                assert_eq!(decimals, 6);
            }
            other => panic!("unexpected instruction {:?}", other),
        }
    }
}
