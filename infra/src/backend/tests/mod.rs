mod secret_store_tests;
