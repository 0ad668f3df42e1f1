mod default_method_tests;
