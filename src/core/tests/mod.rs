mod round_properties_tests;
