use showcase_core::AdminAccount;

/// Answers whether a username/password pair belongs to an admin.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Fixed list of accounts compared by exact string equality.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    accounts: Vec<AdminAccount>,
}

impl StaticCredentials {
    pub fn new(accounts: Vec<AdminAccount>) -> Self {
        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.accounts
            .iter()
            .any(|a| a.username == username && a.password == password)
    }
}
