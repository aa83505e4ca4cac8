mod kv_state;
