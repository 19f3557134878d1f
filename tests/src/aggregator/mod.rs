mod vault_test;
