mod navigation_tests;
