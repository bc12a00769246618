mod override_traversal_test;
